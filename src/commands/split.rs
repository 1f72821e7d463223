use crate::config::Config;
use crate::pdf::split::split_file;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(
    input: P,
    ranges: &str,
    output: Option<&Path>,
    config: &Config,
) -> Result<()> {
    let summary = split_file(input.as_ref(), ranges, output, config)?;

    for entry in &summary.entries {
        println!("{} ({} page(s))", entry.name, entry.page_count());
    }

    let page_count: u32 = summary.entries.iter().map(|e| e.page_count()).sum();
    println!(
        "Split {} of {} page(s) into {} file(s) in {}",
        page_count,
        summary.total_pages,
        summary.entries.len(),
        summary.output_path.display()
    );

    Ok(())
}
