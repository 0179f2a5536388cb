//! Terminal rendering of view-model snapshots. Pure formatting, no state.

use menuscan_core::{AppViewModel, BulkPhase, RecordRowView, SearchPhase};

pub fn render_search_progress(view: &AppViewModel) {
    if let Some(phase) = view.search_phase {
        let label = match phase {
            SearchPhase::Resolving => "resolving",
            SearchPhase::Extracting => "extracting",
            SearchPhase::Retrying => "empty result, retrying once",
        };
        println!("[search] {label}...");
    }
}

pub fn render_record(record: &RecordRowView) {
    println!("{} ({})", record.name, record.location);
    if let Some(url) = &record.source_url {
        println!("  url:          {url}");
    }
    if record.dineout_only {
        println!("  dineout-only listing, menu data not available");
        return;
    }
    println!("  rating:       {} ({} ratings)", record.rating, record.total_ratings);
    if !record.promo_codes.is_empty() {
        println!("  promo codes:");
        for code in &record.promo_codes {
            println!("    - {code}");
        }
    }
    if !record.items_99.is_empty() {
        println!("  items at 99:");
        for item in &record.items_99 {
            println!("    - {item}");
        }
    }
    for (category, items) in &record.offer_items {
        println!("  {category}:");
        for item in items {
            println!("    - {item}");
        }
    }
}

pub fn render_bulk_progress(view: &AppViewModel) {
    match view.bulk_phase {
        BulkPhase::Uploading => println!("[bulk] uploading..."),
        BulkPhase::Processing | BulkPhase::Completed => {
            if let Some(job) = &view.job {
                let terminal = job.items.iter().filter(|item| item.terminal).count();
                println!(
                    "[bulk] job {} {}% ({terminal}/{} done)",
                    job.job_id,
                    job.progress_percent,
                    job.items.len()
                );
            }
        }
        BulkPhase::Idle | BulkPhase::Failed => {}
    }
}

pub fn render_bulk_outcome(view: &AppViewModel) {
    if let Some(job) = &view.job {
        for item in &job.items {
            println!("  {} @ {}: {}", item.name, item.location, item.status_label);
            if let Some(rating) = &item.rating {
                println!("      rating {rating}");
            }
            if item.dineout_only {
                println!("      dineout-only listing");
            }
            if let Some(message) = &item.error_message {
                println!("      {message}");
            }
        }
    }
    if let Some(path) = &view.export_path {
        println!("[bulk] results saved to {path}");
    }
}
