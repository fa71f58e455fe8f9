use clap::Args;
use eyre::{Context, Result};
use serde_json::Value;
use shared::near::{Deposit, FunctionCallRequest, Gas, ViewRequest};

use super::common::{run_view, send_call, SignerArgs};
use crate::config::Config;

/// An arbitrary change call.
#[derive(Args, Debug)]
pub(crate) struct CallArgs {
    #[arg(short = 'c', long)]
    contract: String,

    #[arg(long)]
    method: String,

    /// JSON arguments
    #[arg(long, default_value = "{}")]
    args: String,

    /// Prepaid gas
    #[arg(long, default_value_t = Gas::MAX)]
    gas: Gas,

    /// Attached deposit in yoctoNEAR
    #[arg(long, default_value_t = Deposit::ZERO)]
    deposit: Deposit,

    #[command(flatten)]
    signer: SignerArgs,
}

/// An arbitrary view call.
#[derive(Args, Debug)]
pub(crate) struct ViewArgs {
    #[arg(short = 'c', long)]
    contract: String,

    #[arg(long)]
    method: String,

    /// JSON arguments
    #[arg(long, default_value = "{}")]
    args: String,
}

fn parse_args(args: &str) -> Result<Value> {
    serde_json::from_str(args).with_context(|| format!("--args is not valid JSON: {args}"))
}

pub(crate) async fn handle_call(call: CallArgs, config: &Config) -> Result<()> {
    let request = FunctionCallRequest::new(call.contract, call.method)
        .with_args(parse_args(&call.args)?)
        .with_gas(call.gas)
        .with_deposit(call.deposit);
    send_call(&request, &call.signer, config, "done").await
}

pub(crate) async fn handle_view(view: ViewArgs, config: &Config) -> Result<()> {
    let request = ViewRequest::new(view.contract, view.method).with_args(parse_args(&view.args)?);
    run_view(&request, config).await
}
