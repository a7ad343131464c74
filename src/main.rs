#[tokio::main]
async fn main() {
    bookdesk_backend::run().await;
}
