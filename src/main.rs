use clap::Parser;
use lookup_route::utils::logger;
use lookup_route::{CfApi, CliConfig, OutputFormat, Resolution, RouteResolver};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    if config.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(config.verbose);
    }
    tracing::debug!(
        "hostname: {:?}, output: {:?}, config: {:?}",
        config.hostname,
        config.output,
        config.config
    );

    let resolution = match run(&config).await {
        Ok(Some(resolution)) => resolution,
        Ok(None) => {
            println!("nothing to do");
            return;
        }
        Err(e) => {
            println!("{}", logger::failure_line(&e));
            std::process::exit(1);
        }
    };

    match render(&resolution, config.output) {
        Ok(output) => println!("{}", output),
        Err(e) => fail(&e),
    }
}

/// 沒有給 hostname 時回傳 None
async fn run(config: &CliConfig) -> lookup_route::Result<Option<Resolution>> {
    let credentials = config.session()?.require()?;

    let Some(hostname) = config.hostname.as_deref() else {
        return Ok(None);
    };

    let api = CfApi::new(credentials.api_endpoint, credentials.access_token);
    tracing::info!("Resolving {} via {}", hostname, api.endpoint());

    let resolver = RouteResolver::new(api);
    resolver.resolve(hostname).await.map(Some)
}

fn render(resolution: &Resolution, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => resolution.to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(resolution)?,
    })
}

fn fail(e: &dyn std::fmt::Display) -> ! {
    println!("error: {}", e);
    std::process::exit(1);
}
