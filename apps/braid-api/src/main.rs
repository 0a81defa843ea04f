use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;

	let args = braid_api::Args::parse();

	braid_api::run(args).await
}
