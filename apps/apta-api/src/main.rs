use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = apta_api::Args::parse();
	apta_api::run(args).await
}
