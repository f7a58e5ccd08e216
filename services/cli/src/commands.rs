use clap::Args;
use dealflow::audit::HeaderAudit;
use dealflow::columns::ColumnRole;
use dealflow::config::{AppConfig, LoadConfig};
use dealflow::error::AppError;
use dealflow::format::money;
use dealflow::pipelines::outreach::{OfferRules, OutreachPipeline, OutreachRun};
use dealflow::pipelines::scrub::{ScrubPipeline, ScrubReport, ScrubRules};
use dealflow::pipelines::skiptrace::{SkiptracePipeline, SkiptraceRules};
use dealflow::table::LeadTable;
use dealflow::underwriting::{self, motivation, repairs::CostMatrix, RiskTier};
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_INPUT: &str = "leads.csv";
const DEFAULT_OUTREACH_OUTPUT: &str = "outreach_ready.csv";
const DEFAULT_SCRUB_OUTPUT: &str = "scrubbed_leads.csv";
const DEFAULT_SKIPTRACE_OUTPUT: &str = "ready_for_skip_trace.csv";
const PREVIEW_ROWS: usize = 10;

#[derive(Args, Debug, Default)]
pub(crate) struct OutreachArgs {
    /// Lead list to process (CSV, TSV, or spreadsheet). Defaults to leads.csv
    #[arg(short, long)]
    pub(crate) input: Option<PathBuf>,
    /// Destination for the outreach-ready CSV
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
    /// Override the SEND_OFFER threshold in dollars
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Share of estimated value kept after the wholesale discount
    #[arg(long)]
    pub(crate) margin: Option<f64>,
    /// Repair budget per square foot when a sqft column resolves
    #[arg(long)]
    pub(crate) repair_rate: Option<f64>,
    /// Fixed closing and assignment costs in dollars
    #[arg(long)]
    pub(crate) fee: Option<f64>,
    /// Override the configured row cap (0 reads everything)
    #[arg(long)]
    pub(crate) max_rows: Option<usize>,
    /// Write a JSON audit of headers and role bindings to this path
    #[arg(long)]
    pub(crate) audit: Option<PathBuf>,
}

pub(crate) fn run_outreach(args: OutreachArgs, config: &AppConfig) -> Result<(), AppError> {
    let OutreachArgs {
        input,
        output,
        threshold,
        margin,
        repair_rate,
        fee,
        max_rows,
        audit,
    } = args;

    let input = input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTREACH_OUTPUT));
    let load = effective_load(config, max_rows);

    let defaults = OfferRules::default();
    let rules = OfferRules {
        send_offer_threshold: threshold.unwrap_or(defaults.send_offer_threshold),
        margin: margin.unwrap_or(defaults.margin),
        repair_rate_per_sqft: repair_rate.unwrap_or(defaults.repair_rate_per_sqft),
        transaction_fee: fee.unwrap_or(defaults.transaction_fee),
        ..defaults
    };

    info!(input = %input.display(), "drafting outreach");
    let table = LeadTable::from_path(&input, &load)?;
    write_header_audit(&table, audit.as_deref())?;
    let run = OutreachPipeline::new(rules).process(&table)?;
    run.write_csv(&output)?;

    render_outreach_summary(&run, &output);
    Ok(())
}

#[derive(Args, Debug, Default)]
pub(crate) struct ScrubArgs {
    /// Raw list to scrub (CSV, TSV, or spreadsheet). Defaults to leads.csv
    #[arg(short, long)]
    pub(crate) input: Option<PathBuf>,
    /// Destination for the scrubbed CSV
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
    /// Keep only properties built before this year
    #[arg(long)]
    pub(crate) year_cutoff: Option<f64>,
    /// Keep only properties with more living area than this
    #[arg(long)]
    pub(crate) sqft_floor: Option<f64>,
    /// Share of market value kept after the wholesale discount
    #[arg(long)]
    pub(crate) margin: Option<f64>,
    /// Repair budget per square foot for the MAO column
    #[arg(long)]
    pub(crate) repair_rate: Option<f64>,
    /// Fixed closing and assignment costs in dollars
    #[arg(long)]
    pub(crate) fee: Option<f64>,
    /// Cap the number of exported rows (0 keeps them all)
    #[arg(long)]
    pub(crate) export_cap: Option<usize>,
    /// Input column to carry into the export (repeatable); default keeps all
    #[arg(long = "column")]
    pub(crate) columns: Vec<String>,
    /// Override the configured row cap (0 reads everything)
    #[arg(long)]
    pub(crate) max_rows: Option<usize>,
    /// Write a JSON audit of headers and role bindings to this path
    #[arg(long)]
    pub(crate) audit: Option<PathBuf>,
}

pub(crate) fn run_scrub(args: ScrubArgs, config: &AppConfig) -> Result<(), AppError> {
    let ScrubArgs {
        input,
        output,
        year_cutoff,
        sqft_floor,
        margin,
        repair_rate,
        fee,
        export_cap,
        columns,
        max_rows,
        audit,
    } = args;

    let input = input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_SCRUB_OUTPUT));
    let load = effective_load(config, max_rows);

    let defaults = ScrubRules::default();
    let rules = ScrubRules {
        year_built_cutoff: year_cutoff.unwrap_or(defaults.year_built_cutoff),
        sqft_floor: sqft_floor.unwrap_or(defaults.sqft_floor),
        margin: margin.unwrap_or(defaults.margin),
        repair_rate_per_sqft: repair_rate.unwrap_or(defaults.repair_rate_per_sqft),
        transaction_fee: fee.unwrap_or(defaults.transaction_fee),
        export_cap: export_cap.unwrap_or(defaults.export_cap),
        export_columns: columns,
    };

    info!(input = %input.display(), "scrubbing list");
    let table = LeadTable::from_path(&input, &load)?;
    write_header_audit(&table, audit.as_deref())?;
    let scrubbed = ScrubPipeline::new(rules).process(&table)?;
    scrubbed.write_csv(&output)?;

    render_scrub_summary(&scrubbed.report, &output);
    Ok(())
}

#[derive(Args, Debug, Default)]
pub(crate) struct SkiptraceArgs {
    /// List to prepare (CSV, TSV, or spreadsheet). Defaults to the scrub output
    #[arg(short, long)]
    pub(crate) input: Option<PathBuf>,
    /// Destination for the vendor-ready CSV
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
    /// City/state tail appended to bare street addresses
    #[arg(long)]
    pub(crate) suffix: Option<String>,
    /// Override the configured row cap (0 reads everything)
    #[arg(long)]
    pub(crate) max_rows: Option<usize>,
    /// Write a JSON audit of headers and role bindings to this path
    #[arg(long)]
    pub(crate) audit: Option<PathBuf>,
}

pub(crate) fn run_skiptrace(args: SkiptraceArgs, config: &AppConfig) -> Result<(), AppError> {
    let SkiptraceArgs {
        input,
        output,
        suffix,
        max_rows,
        audit,
    } = args;

    let input = input.unwrap_or_else(|| PathBuf::from(DEFAULT_SCRUB_OUTPUT));
    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_SKIPTRACE_OUTPUT));
    let load = effective_load(config, max_rows);

    let defaults = SkiptraceRules::default();
    let rules = SkiptraceRules {
        locality_suffix: suffix.unwrap_or(defaults.locality_suffix),
    };

    info!(input = %input.display(), "preparing skip-trace file");
    let table = LeadTable::from_path(&input, &load)?;
    write_header_audit(&table, audit.as_deref())?;
    let prepared = SkiptracePipeline::new(rules).process(&table)?;
    prepared.write_csv(&output)?;

    println!(
        "Prepared {} rows for skip tracing ({})",
        prepared.report.rows_exported,
        prepared.headers.join(", ")
    );
    println!("Saved: {}", output.display());
    Ok(())
}

#[derive(Args, Debug)]
pub(crate) struct InspectArgs {
    /// File to inspect (CSV, TSV, or spreadsheet). Defaults to leads.csv
    #[arg(short, long)]
    pub(crate) input: Option<PathBuf>,
    /// Number of data rows to print
    #[arg(long, default_value_t = 5)]
    pub(crate) rows: usize,
    /// Override the configured row cap (0 reads everything)
    #[arg(long)]
    pub(crate) max_rows: Option<usize>,
    /// Write a JSON audit of headers and role bindings to this path
    #[arg(long)]
    pub(crate) audit: Option<PathBuf>,
}

pub(crate) fn run_inspect(args: InspectArgs, config: &AppConfig) -> Result<(), AppError> {
    let InspectArgs {
        input,
        rows,
        max_rows,
        audit,
    } = args;

    let input = input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let load = effective_load(config, max_rows);

    let table = LeadTable::from_path(&input, &load)?;
    write_header_audit(&table, audit.as_deref())?;

    let origin = table.origin();
    println!("Source: {}", origin.source);
    println!("Format: {}", origin.format.describe());
    println!(
        "Rows: {} ({} skipped{})",
        table.row_count(),
        origin.skipped_records,
        if origin.capped { ", capped" } else { "" }
    );
    println!("Headers:");
    for header in table.headers() {
        println!("  - {header}");
    }
    println!("Role bindings:");
    for role in ColumnRole::ALL {
        match role.bind(table.headers()) {
            Some(binding) => println!(
                "  - {}: {} (column {})",
                role.label(),
                binding.header,
                binding.index
            ),
            None => println!("  - {}: not detected", role.label()),
        }
    }
    if !table.is_empty() {
        println!("First {} rows:", table.row_count().min(rows));
        for row in table.rows().iter().take(rows) {
            println!("  {}", row.join(" | "));
        }
    }
    Ok(())
}

#[derive(Args, Debug)]
pub(crate) struct QualifyArgs {
    /// Street address, echoed in the summary
    #[arg(long)]
    pub(crate) address: Option<String>,
    /// After-repair value in dollars
    #[arg(long)]
    pub(crate) arv: f64,
    /// Construction year
    #[arg(long)]
    pub(crate) year_built: u32,
    /// Living area in square feet
    #[arg(long)]
    pub(crate) sqft: f64,
    /// Bathroom count for the repair estimate
    #[arg(long, default_value_t = 2.0)]
    pub(crate) baths: f64,
    /// Years the current owner has held the property
    #[arg(long, default_value_t = 0)]
    pub(crate) ownership_years: u32,
    /// Risk tier: 1 pays the most, 3 the least
    #[arg(long, default_value_t = 2)]
    pub(crate) tier: u8,
    /// Walkthrough repair estimate in dollars; skips the component model
    #[arg(long)]
    pub(crate) repairs: Option<f64>,
    /// Fixed closing and assignment costs
    #[arg(long, default_value_t = underwriting::DEFAULT_TRANSACTION_FEE)]
    pub(crate) fee: f64,
}

pub(crate) fn run_qualify(args: QualifyArgs) -> Result<(), AppError> {
    let QualifyArgs {
        address,
        arv,
        year_built,
        sqft,
        baths,
        ownership_years,
        tier,
        repairs,
        fee,
    } = args;

    let tier = RiskTier::from_number(tier);
    let (repair_budget, offer) = match repairs {
        // A walkthrough figure still gets padded before the offer math.
        Some(walkthrough) => (
            walkthrough * underwriting::REPAIR_CONTINGENCY,
            underwriting::expert_mao(arv, walkthrough, fee, tier),
        ),
        // The component estimate already carries the contingency.
        None => {
            let estimate = CostMatrix::default().estimate(year_built, sqft, baths);
            (estimate, underwriting::mao(arv, estimate, fee, tier.margin()))
        }
    };
    let motivation = motivation::assess(ownership_years);

    match &address {
        Some(address) => println!("Qualification for {address}"),
        None => println!("Qualification"),
    }
    println!("- ARV: {}", money(arv));
    println!("- Repair budget: {} (contingency included)", money(repair_budget));
    println!(
        "- Risk tier: {} ({:.0}% of ARV)",
        tier.label(),
        tier.margin() * 100.0
    );
    println!("- Maximum allowable offer: {}", money(offer));
    println!("- Motivation score: {}", motivation.score);
    for flag in &motivation.flags {
        println!("  - {flag}");
    }

    if offer > 0.0 {
        println!("Verdict: pursue");
        println!(
            "{}",
            underwriting::offer_justification(year_built, sqft, offer)
        );
    } else {
        println!("Verdict: pass; the numbers do not support an offer");
    }
    Ok(())
}

#[derive(Args, Debug)]
pub(crate) struct ChainArgs {
    /// Raw list to run end to end (CSV, TSV, or spreadsheet). Defaults to leads.csv
    #[arg(short, long)]
    pub(crate) input: Option<PathBuf>,
    /// Destination for the outreach-ready CSV
    #[arg(short, long)]
    pub(crate) output: Option<PathBuf>,
    /// Where to keep the intermediate scrubbed list
    #[arg(long)]
    pub(crate) scrubbed: Option<PathBuf>,
    /// Keep only properties built before this year
    #[arg(long)]
    pub(crate) year_cutoff: Option<f64>,
    /// Keep only properties with more living area than this
    #[arg(long)]
    pub(crate) sqft_floor: Option<f64>,
    /// Override the SEND_OFFER threshold in dollars
    #[arg(long)]
    pub(crate) threshold: Option<f64>,
    /// Override the configured row cap (0 reads everything)
    #[arg(long)]
    pub(crate) max_rows: Option<usize>,
    /// Write a JSON audit of the raw input's headers and bindings to this path
    #[arg(long)]
    pub(crate) audit: Option<PathBuf>,
}

pub(crate) fn run_chain(args: ChainArgs, config: &AppConfig) -> Result<(), AppError> {
    let ChainArgs {
        input,
        output,
        scrubbed,
        year_cutoff,
        sqft_floor,
        threshold,
        max_rows,
        audit,
    } = args;

    let input = input.unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT));
    let output = output.unwrap_or_else(|| PathBuf::from(DEFAULT_OUTREACH_OUTPUT));
    let scrubbed_path = scrubbed.unwrap_or_else(|| PathBuf::from(DEFAULT_SCRUB_OUTPUT));
    let load = effective_load(config, max_rows);

    let defaults = ScrubRules::default();
    let scrub_rules = ScrubRules {
        year_built_cutoff: year_cutoff.unwrap_or(defaults.year_built_cutoff),
        sqft_floor: sqft_floor.unwrap_or(defaults.sqft_floor),
        ..defaults
    };

    info!(input = %input.display(), "running scrub then outreach");
    let table = LeadTable::from_path(&input, &load)?;
    write_header_audit(&table, audit.as_deref())?;
    let scrubbed_output = ScrubPipeline::new(scrub_rules).process(&table)?;
    scrubbed_output.write_csv(&scrubbed_path)?;
    render_scrub_summary(&scrubbed_output.report, &scrubbed_path);

    if scrubbed_output.rows.is_empty() {
        println!("Nothing passed the scrub; no outreach drafted");
        return Ok(());
    }

    let mut offer_rules = OfferRules::default();
    if let Some(threshold) = threshold {
        offer_rules.send_offer_threshold = threshold;
    }

    // The scrubbed file already fits within the row cap; read it back whole.
    let run = OutreachPipeline::new(offer_rules).run_file(
        &scrubbed_path,
        &output,
        &LoadConfig::uncapped(),
    )?;
    render_outreach_summary(&run, &output);
    Ok(())
}

fn effective_load(config: &AppConfig, max_rows: Option<usize>) -> LoadConfig {
    match max_rows {
        Some(max_rows) => LoadConfig { max_rows },
        None => config.load.clone(),
    }
}

fn write_header_audit(table: &LeadTable, path: Option<&Path>) -> Result<(), AppError> {
    if let Some(path) = path {
        HeaderAudit::capture(table).write(path)?;
        println!("Header audit: {}", path.display());
    }
    Ok(())
}

fn render_scrub_summary(report: &ScrubReport, output: &Path) {
    println!(
        "Scrubbed {} rows: {} exported, {} outside criteria, {} missing data",
        report.rows_read,
        report.rows_exported,
        report.rows_outside_criteria,
        report.rows_missing_data
    );
    if report.export_capped {
        println!("Export capped; raise --export-cap to keep more rows");
    }
    println!("Saved: {}", output.display());
}

fn render_outreach_summary(run: &OutreachRun, output: &Path) {
    println!(
        "Processed {} leads ({} priced to send)",
        run.leads.len(),
        run.send_offer_count()
    );
    println!("Saved: {}", output.display());

    if run.leads.is_empty() {
        return;
    }
    println!("First {} drafts:", run.leads.len().min(PREVIEW_ROWS));
    for lead in run.leads.iter().take(PREVIEW_ROWS) {
        let offer = match lead.offer_proxy {
            Some(amount) => money(amount),
            None => "no offer".to_string(),
        };
        println!(
            "  - {} | {} | {}",
            lead.property_address,
            lead.action.label(),
            offer
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dealflow::config::{AppEnvironment, TelemetryConfig};

    fn test_config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            load: LoadConfig::default(),
        }
    }

    fn audit_json(path: &Path) -> serde_json::Value {
        let text = std::fs::read_to_string(path).expect("audit readable");
        serde_json::from_str(&text).expect("valid json")
    }

    #[test]
    fn outreach_pricing_flags_override_the_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("leads.csv");
        std::fs::write(
            &input,
            "Owner Name,Property Address,Est Value,Building Sqft\nMaria,12 Oak St,200000,1000\n",
        )
        .expect("fixture written");
        let output = dir.path().join("outreach.csv");

        let args = OutreachArgs {
            input: Some(input),
            output: Some(output.clone()),
            threshold: Some(50_000.0),
            margin: Some(0.60),
            repair_rate: Some(40.0),
            fee: Some(5_000.0),
            max_rows: None,
            audit: None,
        };
        run_outreach(args, &test_config()).expect("command runs");

        // 200000 * 0.60 - 1000 * 40 - 5000, sent under the lowered threshold.
        let text = std::fs::read_to_string(&output).expect("export readable");
        assert!(text.contains("75000"));
        assert!(text.contains("SEND_OFFER"));
    }

    #[test]
    fn scrub_pricing_flags_override_the_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("county.csv");
        std::fs::write(
            &input,
            "site_addr_1,yr_impr,bld_ar,tot_mkt_val\n12 Oak St,1975,2000,200000\n",
        )
        .expect("fixture written");
        let output = dir.path().join("scrubbed.csv");

        let args = ScrubArgs {
            input: Some(input),
            output: Some(output.clone()),
            year_cutoff: None,
            sqft_floor: None,
            margin: Some(0.60),
            repair_rate: Some(20.0),
            fee: Some(0.0),
            export_cap: None,
            columns: Vec::new(),
            max_rows: None,
            audit: None,
        };
        run_scrub(args, &test_config()).expect("command runs");

        // 200000 * 0.60 - 2000 * 20 - 0.
        let text = std::fs::read_to_string(&output).expect("export readable");
        assert!(text.contains("80000"));
    }

    #[test]
    fn skiptrace_writes_a_header_audit_when_asked() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("scrubbed.csv");
        std::fs::write(&input, "site_addr_1,tot_mkt_val,MAO\n12 Oak St,200000,70000\n")
            .expect("fixture written");
        let output = dir.path().join("ready.csv");
        let audit = dir.path().join("audit.json");

        let args = SkiptraceArgs {
            input: Some(input),
            output: Some(output.clone()),
            suffix: None,
            max_rows: None,
            audit: Some(audit.clone()),
        };
        run_skiptrace(args, &test_config()).expect("command runs");

        assert!(output.exists());
        let value = audit_json(&audit);
        assert_eq!(value["headers"][0], "site_addr_1");
        let address = value["bindings"]
            .as_array()
            .and_then(|bindings| bindings.iter().find(|binding| binding["role"] == "address"))
            .expect("address binding recorded");
        assert_eq!(address["header"], "site_addr_1");
    }

    #[test]
    fn skiptrace_skips_the_audit_when_not_asked() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("scrubbed.csv");
        std::fs::write(&input, "Address\n12 Oak St\n").expect("fixture written");
        let output = dir.path().join("ready.csv");

        let args = SkiptraceArgs {
            input: Some(input),
            output: Some(output.clone()),
            suffix: None,
            max_rows: None,
            audit: None,
        };
        run_skiptrace(args, &test_config()).expect("command runs");

        assert!(output.exists());
        assert!(!dir.path().join("audit.json").exists());
    }

    #[test]
    fn chain_audits_the_raw_input_when_asked() {
        let dir = tempfile::tempdir().expect("temp dir");
        let input = dir.path().join("leads.csv");
        std::fs::write(
            &input,
            "Owner Name,Property Address,Est Value,yr_impr,Building Sqft\n\
             Maria,12 Oak St,400000,1965,2000\n",
        )
        .expect("fixture written");
        let audit = dir.path().join("audit.json");

        let args = ChainArgs {
            input: Some(input),
            output: Some(dir.path().join("outreach.csv")),
            scrubbed: Some(dir.path().join("scrubbed.csv")),
            year_cutoff: None,
            sqft_floor: None,
            threshold: None,
            max_rows: None,
            audit: Some(audit.clone()),
        };
        run_chain(args, &test_config()).expect("command runs");

        let value = audit_json(&audit);
        assert_eq!(value["headers"].as_array().map(Vec::len), Some(5));
        assert_eq!(value["headers"][3], "yr_impr");
    }
}
