//! Run command - resolves one request from the command line

use std::collections::HashMap;

use anyhow::{anyhow, Context};
use clap::Args;

use crate::config::AppConfig;
use crate::domain::WorkflowData;
use crate::infrastructure::logging;
use crate::infrastructure::openapi::normalize_swagger_source;

#[derive(Args, Clone, Debug)]
pub struct RunArgs {
    /// Free-text request
    #[arg(long)]
    pub text: String,

    /// OpenAPI document URL or path under the shared folder
    #[arg(long)]
    pub swagger: String,

    /// Header forwarded to every API call, as NAME=VALUE
    #[arg(long = "header", value_name = "NAME=VALUE")]
    pub headers: Vec<String>,

    /// Base URL for relative payload paths
    #[arg(long)]
    pub server_base_url: Option<String>,
}

impl RunArgs {
    fn into_workflow_data(self, shared_folder: &str) -> anyhow::Result<WorkflowData> {
        let headers = parse_headers(&self.headers)?;
        let source = normalize_swagger_source(&self.swagger, shared_folder);

        let mut data = WorkflowData::new(self.text, source).with_headers(headers);
        if let Some(base_url) = self.server_base_url {
            data = data.with_server_base_url(base_url);
        }

        Ok(data)
    }
}

fn parse_headers(raw: &[String]) -> anyhow::Result<HashMap<String, String>> {
    raw.iter()
        .map(|header| {
            let (name, value) = header
                .split_once('=')
                .ok_or_else(|| anyhow!("Invalid header '{}', expected NAME=VALUE", header))?;

            Ok((name.trim().to_string(), value.to_string()))
        })
        .collect()
}

/// Resolve the request and print the JSON result to stdout
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    logging::init_logging(&config.logging);

    let data = args.into_workflow_data(&config.openapi.shared_folder)?;
    let services = crate::create_services(&config).await?;

    let output = services
        .resolver
        .resolve(&data)
        .await
        .context("Workflow resolution failed")?;

    println!("{}", serde_json::to_string_pretty(&output.into_json())?);

    Ok(())
}
