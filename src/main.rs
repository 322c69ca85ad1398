#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    sak_toolbox_lib::run().await
}
