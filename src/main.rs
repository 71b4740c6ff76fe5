#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = lms_grader::run().await {
        eprintln!("lms-grader fatal: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}
