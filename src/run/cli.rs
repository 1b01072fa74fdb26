use anyhow::{Context, Result};

use smeta::files::{self, Format};
use smeta::ledger::{format_percentage, ImportReport, Ledger};
use smeta::models::REGIONS;
use smeta::settings::Settings;

use crate::ui::util::{expand_home, format_amount};

pub(crate) fn as_cli(args: &[String], settings: &Settings) -> Result<()> {
    match args[1].as_str() {
        "summary" | "s" => cli_summary(&args[2..], settings),
        "convert" | "c" => cli_convert(&args[2..], settings),
        "regions" => {
            cli_regions();
            Ok(())
        }
        "--help" | "-h" | "help" => {
            print_usage();
            Ok(())
        }
        "--version" | "-V" | "version" => {
            println!("smeta {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        other => {
            print_usage();
            anyhow::bail!("Unknown command: {other}");
        }
    }
}

fn print_usage() {
    println!("Smeta: regional budget planner");
    println!();
    println!("Usage: smeta [command]");
    println!();
    println!("Commands:");
    println!("  (none)                        Launch interactive TUI");
    println!("  summary <file>                Load an xlsx/json/csv document and print each region");
    println!("  convert <in> <out>            Convert between xlsx, json and csv through the ledger");
    println!("  regions                       List the region catalogue");
    println!("  --help, -h                    Show this help");
    println!("  --version, -V                 Show version");
}

fn load(path_arg: &str, settings: &Settings) -> Result<(Ledger, ImportReport)> {
    let path = expand_home(path_arg);
    if !path.exists() {
        anyhow::bail!("File not found: {path_arg}");
    }
    let mut ledger = Ledger::new();
    let report = files::import(&mut ledger, &path, settings.io_timeout())
        .with_context(|| format!("Failed to load {path_arg}"))?;
    for issue in &report.issues {
        eprintln!("Warning: {issue}");
    }
    Ok((ledger, report))
}

fn cli_summary(args: &[String], settings: &Settings) -> Result<()> {
    let Some(file) = args.first() else {
        anyhow::bail!("Usage: smeta summary <file>");
    };
    let (ledger, report) = load(file, settings)?;
    println!("{}", report.describe());

    if ledger.is_empty() {
        println!("No budgets in {file}");
        return Ok(());
    }

    let currency = settings.currency.as_str();
    for (region, record) in ledger.iter() {
        let summary = record.summary();
        println!();
        println!("{region}");
        println!("{}", "─".repeat(40));
        println!(
            "  Total:      {}",
            format_amount(summary.total_budget, currency)
        );
        println!(
            "  Used:       {} ({})",
            format_amount(summary.used_amount, currency),
            format_percentage(summary.used_percentage)
        );
        println!(
            "  Remaining:  {}",
            format_amount(summary.remaining_amount, currency)
        );
        if summary.is_over_budget() {
            println!("  ! over budget");
        }
        for (item, pct) in record.items_with_percentages() {
            println!(
                "    {:<6} {:<28} {:>18} {:>8}",
                item.number,
                item.name,
                format_amount(item.amount, currency),
                format_percentage(pct)
            );
        }
    }
    Ok(())
}

fn cli_convert(args: &[String], settings: &Settings) -> Result<()> {
    let (Some(input), Some(output)) = (args.first(), args.get(1)) else {
        anyhow::bail!("Usage: smeta convert <in> <out>");
    };
    let (ledger, _) = load(input, settings)?;

    let out = expand_home(output);
    let format = Format::detect(&out)?;
    let written = files::export(&ledger, &out, format, settings.io_timeout())?;
    println!(
        "Wrote {} region{} as {format} to {}",
        ledger.len(),
        if ledger.len() == 1 { "" } else { "s" },
        written
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );
    Ok(())
}

fn cli_regions() {
    for (i, region) in REGIONS.iter().enumerate() {
        println!("{:>3}  {region}", i + 1);
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        std::iter::once("smeta")
            .chain(list.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_unknown_command_fails() {
        let err = as_cli(&args(&["frobnicate"]), &Settings::default()).unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_summary_requires_file() {
        assert!(as_cli(&args(&["summary"]), &Settings::default()).is_err());
        assert!(as_cli(&args(&["summary", "/no/such/file.json"]), &Settings::default()).is_err());
    }

    #[test]
    fn test_convert_json_to_xlsx() {
        let dir = tempfile::tempdir().unwrap();
        let mut ledger = Ledger::new();
        ledger
            .set_total_budget("Bakı", rust_decimal_macros::dec!(1000))
            .unwrap();
        ledger
            .add_item("Bakı", "1", "Yol", rust_decimal_macros::dec!(500))
            .unwrap();
        let json = dir.path().join("in.json");
        std::fs::write(&json, ledger.export_json().unwrap()).unwrap();

        let xlsx = dir.path().join("out.xlsx");
        as_cli(
            &args(&["convert", json.to_str().unwrap(), xlsx.to_str().unwrap()]),
            &Settings::default(),
        )
        .unwrap();
        assert!(xlsx.exists());

        let mut back = Ledger::new();
        files::import(&mut back, &xlsx, std::time::Duration::from_secs(5)).unwrap();
        assert_eq!(back.record("Bakı").unwrap().items()[0].name, "Yol");
    }
}
