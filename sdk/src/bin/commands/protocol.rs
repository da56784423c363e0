// Protocol configuration, address and error-code commands

use anyhow::Result;
use clap::{Args, Subcommand};
use serde_json::json;
use yield_market_sdk::{
    classify_fault, ErrorContext, PdaBuilder, ProgramErrorCode, TransportFault,
};

use super::utils::{field, info, print_json, success, warn, CliContext};

#[derive(Args)]
pub struct PdaCmd {
    #[command(subcommand)]
    kind: PdaKind,
}

#[derive(Subcommand)]
enum PdaKind {
    /// Protocol config address
    Config,
    /// Yield deal address and its token vault
    YieldDeal { deal_id: u64 },
    /// LP deal address and its position NFT vault
    LpDeal { deal_id: u64 },
}

#[derive(Args)]
pub struct ExplainErrorCmd {
    /// Custom program error code (e.g. 6004)
    code: u32,

    /// Deal the failed transaction targeted
    #[arg(long)]
    deal_id: Option<u64>,

    /// Duration in days the failed transaction requested
    #[arg(long)]
    duration: Option<u64>,

    /// Original error message, used when no context is given
    #[arg(long)]
    message: Option<String>,
}

pub async fn show_config(ctx: &CliContext) -> Result<()> {
    let client = ctx.client();
    let Some(config) = client.protocol.get_config().await? else {
        warn("Protocol config not found; the protocol is not initialized");
        return Ok(());
    };

    if ctx.json {
        return print_json(&config);
    }

    info(&format!("Protocol config at {}", config.address));
    field("Authority", config.authority);
    field("Treasury", config.treasury);
    field("Fee", format!("{} bps", config.fee_bps));
    field(
        "Duration range",
        format!("{}..={} days", config.min_duration_days, config.max_duration_days),
    );
    field(
        "Penalty range",
        format!("{}..={} bps", config.min_penalty_bps, config.max_penalty_bps),
    );
    field("Paused", config.is_paused);
    field("Next deal id", config.next_deal_id());
    field("Whitelisted mints", config.whitelist.len());
    for mint in &config.whitelist {
        println!("    {}", mint);
    }
    Ok(())
}

pub async fn show_paused(ctx: &CliContext) -> Result<()> {
    let paused = ctx.client().protocol.is_paused().await?;
    if ctx.json {
        return print_json(&json!({ "paused": paused }));
    }
    if paused {
        warn("Protocol is paused");
    } else {
        success("Protocol is accepting transactions");
    }
    Ok(())
}

pub fn derive_pda(cmd: PdaCmd, ctx: &CliContext) -> Result<()> {
    let pda = PdaBuilder::new(ctx.config.program_id);
    let entries = match cmd.kind {
        PdaKind::Config => vec![("protocol_config", pda.protocol_config())],
        PdaKind::YieldDeal { deal_id } => {
            let deal = pda.yield_deal(deal_id);
            vec![("yield_deal", deal), ("vault", pda.yield_vault(&deal.0))]
        }
        PdaKind::LpDeal { deal_id } => {
            let deal = pda.meteora_lp_deal(deal_id);
            vec![
                ("meteora_lp_deal", deal),
                ("meteora_nft_vault", pda.meteora_nft_vault(&deal.0)),
            ]
        }
    };

    if ctx.json {
        let out: Vec<_> = entries
            .iter()
            .map(|(name, (address, bump))| {
                json!({ "kind": name, "address": address.to_string(), "bump": bump })
            })
            .collect();
        return print_json(&out);
    }

    for (name, (address, bump)) in entries {
        field(name, format!("{} (bump {})", address, bump));
    }
    Ok(())
}

pub fn explain_error(cmd: ExplainErrorCmd, ctx: &CliContext) -> Result<()> {
    let mut context = ErrorContext::operation("explain-error");
    if let Some(deal_id) = cmd.deal_id {
        context = context.with_deal_id(deal_id);
    }
    if let Some(days) = cmd.duration {
        context = context.with_duration(days);
    }

    let mut fault = TransportFault::with_code(cmd.code);
    if let Some(message) = cmd.message {
        fault = fault.message(message);
    }
    let error = classify_fault(fault, &context);
    let known = ProgramErrorCode::from_code(cmd.code);

    if ctx.json {
        return print_json(&json!({
            "code": cmd.code,
            "known": known.is_some(),
            "error": format!("{:?}", error),
            "message": error.to_string(),
        }));
    }

    match known {
        Some(code) => info(&format!("{} -> {:?}", cmd.code, code)),
        None => warn(&format!("{} is not a known program error code", cmd.code)),
    }
    println!("{}", error);
    Ok(())
}

