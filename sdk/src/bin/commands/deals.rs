// Deal inspection commands

use anyhow::{Context, Result};
use clap::Args;
use yield_market_sdk::{
    parse_decimal, quote_purchase_with_config, DealFilter, DealRecord, DealStatus, MeteoraLpDeal,
    SourceProtocol, YieldDeal,
};

use super::utils::{field, info, parse_pubkey, print_json, warn, CliContext};

#[derive(Args)]
pub struct DealCmd {
    /// Deal identifier
    deal_id: u64,

    /// Look up a Meteora LP deal instead of a yield deal
    #[arg(long)]
    lp: bool,
}

#[derive(Args)]
pub struct DealsCmd {
    /// List Meteora LP deals instead of yield deals
    #[arg(long)]
    lp: bool,

    /// Status or comma-separated statuses (created, active, settled, cancelled, boughtBack)
    #[arg(long, value_delimiter = ',')]
    status: Vec<String>,

    #[arg(long)]
    seller: Option<String>,

    #[arg(long)]
    buyer: Option<String>,

    /// Source protocol, yield deals only (e.g. jito, kaminoLend)
    #[arg(long)]
    protocol: Option<String>,

    /// Minimum selling price as a decimal (e.g. 12.5)
    #[arg(long)]
    min_price: Option<String>,

    /// Maximum selling price as a decimal
    #[arg(long)]
    max_price: Option<String>,
}

impl DealsCmd {
    fn filter(&self, ctx: &CliContext) -> Result<DealFilter> {
        let mut filter = DealFilter::new();

        let statuses = self
            .status
            .iter()
            .map(|s| s.parse::<DealStatus>())
            .collect::<Result<Vec<_>, _>>()?;
        match statuses.len() {
            0 => {}
            1 => filter = filter.status(statuses[0]),
            _ => filter = filter.status(statuses),
        }

        if let Some(seller) = &self.seller {
            filter = filter.seller(parse_pubkey(seller)?);
        }
        if let Some(buyer) = &self.buyer {
            filter = filter.buyer(parse_pubkey(buyer)?);
        }
        if let Some(protocol) = &self.protocol {
            filter = filter.source_protocol(protocol.parse::<SourceProtocol>()?);
        }
        if let Some(price) = &self.min_price {
            let price = parse_decimal(price, ctx.config.decimals).context("Invalid --min-price")?;
            filter = filter.min_price(price);
        }
        if let Some(price) = &self.max_price {
            let price = parse_decimal(price, ctx.config.decimals).context("Invalid --max-price")?;
            filter = filter.max_price(price);
        }

        Ok(filter)
    }
}

pub async fn show_deal(cmd: DealCmd, ctx: &CliContext) -> Result<()> {
    let client = ctx.client();

    if cmd.lp {
        match client.lp_deals.get_deal(cmd.deal_id).await? {
            Some(deal) if ctx.json => print_json(&deal)?,
            Some(deal) => print_lp_deal(&deal, ctx),
            None => warn(&format!("LP deal {} not found", cmd.deal_id)),
        }
        return Ok(());
    }

    match client.yield_deals.get_deal(cmd.deal_id).await? {
        Some(deal) if ctx.json => print_json(&deal)?,
        Some(deal) => {
            print_yield_deal(&deal, ctx);
            if deal.is_available {
                if let Some(config) = client.protocol.get_config().await? {
                    let quote = quote_purchase_with_config(deal.selling_price, &config)?;
                    field("Protocol fee", ctx.amount(quote.protocol_fee));
                    field("Seller receives", ctx.amount(quote.seller_proceeds));
                }
            }
        }
        None => warn(&format!("Yield deal {} not found", cmd.deal_id)),
    }
    Ok(())
}

pub async fn list_deals(cmd: DealsCmd, ctx: &CliContext) -> Result<()> {
    let filter = cmd.filter(ctx)?;
    let client = ctx.client();

    if cmd.lp {
        let deals = client.lp_deals.get_deals(Some(&filter)).await?;
        if ctx.json {
            return print_json(&deals);
        }
        info(&format!("{} LP deals", deals.len()));
        deals.iter().for_each(|deal| print_row(deal, ctx));
    } else {
        let deals = client.yield_deals.get_deals(Some(&filter)).await?;
        if ctx.json {
            return print_json(&deals);
        }
        info(&format!("{} yield deals", deals.len()));
        deals.iter().for_each(|deal| print_row(deal, ctx));
    }
    Ok(())
}

fn print_row<D: DealRecord>(deal: &D, ctx: &CliContext) {
    println!(
        "  #{:<6} {:<11} {:>18}  {}",
        deal.deal_id(),
        deal.status(),
        ctx.amount(deal.selling_price()),
        deal.seller()
    );
}

fn status_label(status: DealStatus) -> String {
    if status.is_terminal() {
        format!("{} (closed)", status)
    } else {
        status.to_string()
    }
}

fn print_timeline(
    created_at: chrono::DateTime<chrono::Utc>,
    ends_at: Option<chrono::DateTime<chrono::Utc>>,
    is_expired: bool,
) {
    field("Created", created_at.to_rfc3339());
    match ends_at {
        Some(ends_at) if is_expired => field("Ended", ends_at.to_rfc3339()),
        Some(ends_at) => field("Ends", ends_at.to_rfc3339()),
        None => field("Ends", "not purchased"),
    }
}

fn print_yield_deal(deal: &YieldDeal, ctx: &CliContext) {
    info(&format!("Yield deal #{} at {}", deal.deal_id, deal.address));
    field("Status", status_label(deal.status));
    field("Seller", deal.seller);
    field("Buyer", deal.buyer.map_or("-".to_string(), |b| b.to_string()));
    field(
        "Source protocol",
        format!("{} ({:?})", deal.source_protocol, deal.source_protocol.category()),
    );
    field("Locked tokens", deal.locked_token_amount);
    field("Locked value", ctx.amount(deal.locked_value));
    field("Expected yield", ctx.amount(deal.expected_yield));
    field("Selling price", ctx.amount(deal.selling_price));
    field("Duration", format!("{} days", deal.duration.days()));
    print_timeline(deal.created_at, deal.ends_at, deal.is_expired);
}

fn print_lp_deal(deal: &MeteoraLpDeal, ctx: &CliContext) {
    info(&format!("LP deal #{} at {}", deal.deal_id, deal.address));
    field("Status", status_label(deal.status));
    field("Seller", deal.seller);
    field("Buyer", deal.buyer.map_or("-".to_string(), |b| b.to_string()));
    field("Pool", deal.pool);
    field("Position", deal.position);
    field("Expected fee A", deal.expected_fee_a);
    field("Expected fee B", deal.expected_fee_b);
    field("Expected value", ctx.amount(deal.expected_total_value));
    field("Selling price", ctx.amount(deal.selling_price));
    field("Duration", format!("{} days", deal.duration.days()));
    print_timeline(deal.created_at, deal.ends_at, deal.is_expired);
}
