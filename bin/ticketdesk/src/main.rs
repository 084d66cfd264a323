#[tokio::main]
async fn main() -> Result<(), eyre::Report> {
    ticketdesk::run().await
}
