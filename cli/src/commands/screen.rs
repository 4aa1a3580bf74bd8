use colored::*;
use listguard_common::config::Config;
use listguard_common::models::Listing;
use listguard_core::{AuditEngine, NoiseReason};

use crate::commands::Inputs;
use crate::loader;
use crate::terminal::{colors, print};

const TITLE_WIDTH: usize = 44;

pub fn screen(inputs: &Inputs, cfg: &Config) -> anyhow::Result<()> {
    let engine: AuditEngine = loader::build_engine(inputs)?;
    let (ids, listings): (Vec<String>, Vec<Listing>) = loader::load_listings(&inputs.listings)?;

    let noise: Vec<(&str, &Listing, NoiseReason)> = ids
        .iter()
        .zip(&listings)
        .filter_map(|(id, listing)| engine.screen(listing).map(|reason| (id.as_str(), listing, reason)))
        .collect();

    if cfg.quiet == 0 {
        print::header("unrelated listings", cfg.quiet);
        for (id, listing, reason) in &noise {
            print::print_status(format!(
                "{} {} {}",
                id.color(colors::ACCENT),
                print::truncate(&listing.title, TITLE_WIDTH),
                format!("({reason})").color(colors::SEPARATOR)
            ));
        }
    }

    if cfg.quiet < 2 {
        let flagged: ColoredString = format!("{} of {}", noise.len(), listings.len()).bold().yellow();
        print::fat_separator();
        print::centerln(&format!("Screening Complete: {flagged} listings are noise"));
    }
    Ok(())
}
