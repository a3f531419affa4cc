use std::path::PathBuf;

use mtar_core::error::Result;
use mtar_core::read::check::{EntryCheck, first_mismatch};
use mtar_core::{ExtractOptions, extract, list, pack, verify};
use serde_json::to_string_pretty;

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let s = to_string_pretty(value).map_err(std::io::Error::other)?;
    println!("{s}");
    Ok(())
}

fn print_check(i: usize, c: &EntryCheck) {
    let status = if c.is_ok() { "ok" } else { "MISMATCH" };
    println!(
        "[{i}] {}  {} bytes  checksum={:#06x}  stored={:#06x}  {status}",
        c.name, c.size, c.computed, c.stored
    );
}

pub fn handle_create(archive: PathBuf, inputs: Vec<PathBuf>, json: bool) -> Result<()> {
    let report = pack(&inputs, &archive)?;
    if json {
        return print_json(&report);
    }
    for (i, r) in report.records.iter().enumerate() {
        println!(
            "[{i}] {}  {} bytes  checksum={:#06x}",
            r.name, r.size, r.checksum
        );
    }
    eprintln!(
        "create: wrote {} ({} entries, {} bytes)",
        report.archive.display(),
        report.records.len(),
        report.archive_len()
    );
    Ok(())
}

pub fn handle_extract(
    archive: PathBuf,
    dest: PathBuf,
    strict: bool,
    keep_existing: bool,
    json: bool,
) -> Result<()> {
    let opts = ExtractOptions {
        strict,
        keep_existing,
    };
    let report = extract(&archive, &dest, Some(&opts))?;
    if json {
        return print_json(&report);
    }
    for (i, c) in report.entries.iter().enumerate() {
        print_check(i, c);
    }
    let bad = report.mismatches().count();
    if bad > 0 {
        eprintln!("extract: {bad} entries failed checksum verification");
    }
    Ok(())
}

pub fn handle_list(archive: PathBuf, json: bool) -> Result<()> {
    let listing = list(&archive)?;
    if json {
        return print_json(&listing);
    }
    for r in &listing.records {
        println!("{}  {} bytes  checksum={:#06x}", r.name, r.size, r.checksum);
    }
    let missing = listing.missing_bytes();
    if missing > 0 {
        eprintln!("list: data section is {missing} bytes short of the header");
    }
    Ok(())
}

pub fn handle_verify(archive: PathBuf, json: bool) -> Result<()> {
    let report = verify(&archive)?;
    if json {
        print_json(&report)?;
    } else {
        for (i, c) in report.entries.iter().enumerate() {
            print_check(i, c);
        }
        if report.trailing_bytes > 0 {
            eprintln!("verify: {} trailing bytes", report.trailing_bytes);
        }
    }
    if let Some(err) = first_mismatch(&report.entries) {
        return Err(err);
    }
    if !json {
        eprintln!("verify: OK");
    }
    Ok(())
}
