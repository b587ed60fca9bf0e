#[tokio::main]
async fn main() {
    gym_scheduling_backend::run().await;
}
