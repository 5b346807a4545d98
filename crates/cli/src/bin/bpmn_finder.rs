use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    bpmn_cli::main_entry().await
}
