use carpool_matching::match_result::{MatchResult, RouteStatus};
use comfy_table::{Cell, Table, presets::UTF8_FULL};

fn format_km(value: Option<f64>) -> String {
    value.map_or_else(|| String::from("-"), |value| format!("{value:.2}"))
}

fn format_status(status: &RouteStatus) -> String {
    match status {
        RouteStatus::Resolved => String::from("resolved"),
        RouteStatus::Degraded { error } => format!("degraded: {error}"),
        RouteStatus::NotAttempted => String::from("not attempted"),
    }
}

pub fn results_table(results: &[MatchResult]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "#",
        "Ride",
        "Score",
        "Rating",
        "Pickup (km)",
        "Dropoff (km)",
        "Order",
        "Detour (km)",
        "Detour (min)",
        "Route",
        "Reasons",
    ]);

    for (rank, result) in results.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&result.candidate_ref),
            Cell::new(result.match_score),
            Cell::new(format!("{:.1}", result.owner_rating)),
            Cell::new(format_km(result.pickup_distance_km)),
            Cell::new(format_km(result.dropoff_distance_km)),
            Cell::new(if result.is_valid_order { "ok" } else { "reversed" }),
            Cell::new(format_km(result.detour_distance_km)),
            Cell::new(format_km(result.detour_duration_min)),
            Cell::new(format_status(&result.route_status)),
            Cell::new(result.reasons.join(", ")),
        ]);
    }

    table
}

pub fn print_results(results: &[MatchResult], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else if results.is_empty() {
        println!("No matches");
    } else {
        println!("{}", results_table(results));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_km() {
        assert_eq!(format_km(Some(1.234)), "1.23");
        assert_eq!(format_km(None), "-");
    }

    #[test]
    fn test_format_status() {
        let status = RouteStatus::Degraded {
            error: String::from("deadline exceeded"),
        };
        assert_eq!(format_status(&status), "degraded: deadline exceeded");
    }
}
