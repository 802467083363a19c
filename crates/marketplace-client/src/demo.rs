//! Built-in sample listings for offline/demo mode.
//!
//! Shaped like the server's enriched listing views so screens can render
//! them unchanged. IDs carry a `demo-` prefix.

use chrono::{Duration, Utc};
use marketplace_core::{ListingKind, ListingRecord};
use serde_json::{json, Map, Value};

struct Sample {
    owner: (&'static str, &'static str, &'static str),
    fields: Value,
}

fn samples(kind: ListingKind) -> Vec<Sample> {
    match kind {
        ListingKind::Post => vec![
            Sample {
                owner: ("Rajesh Kumar", "Coimbatore, TN", "+91 90000 11001"),
                fields: json!({
                    "cropName": "Tomato",
                    "quantity": "500 kg",
                    "price": "₹25/kg",
                    "description": "Grade A, harvested this week."
                }),
            },
            Sample {
                owner: ("Priya Devi", "Salem, TN", "+91 90000 11002"),
                fields: json!({
                    "cropName": "Rice (Paddy)",
                    "quantity": "2000 kg",
                    "price": "₹22/kg",
                    "description": "BPT 5204, dried and cleaned."
                }),
            },
        ],
        ListingKind::Tool => vec![
            Sample {
                owner: ("Ravi Kumar", "Coimbatore, TN", "+91 90000 22001"),
                fields: json!({
                    "name": "Tractor",
                    "dailyRate": "₹1,500",
                    "description": "50 HP, suitable for ploughing and haulage."
                }),
            },
            Sample {
                owner: ("Murugan S", "Salem, TN", "+91 90000 22002"),
                fields: json!({
                    "name": "Reversible plough",
                    "dailyRate": "₹300",
                    "description": "3-furrow, for primary tillage."
                }),
            },
            Sample {
                owner: ("Ganesh K", "Madurai, TN", "+91 90000 22003"),
                fields: json!({
                    "name": "Combine harvester",
                    "dailyRate": "₹2,000",
                    "description": "Handles paddy, wheat and millets."
                }),
            },
        ],
        ListingKind::Seed => vec![
            Sample {
                owner: ("Tamil Nadu Seeds Corp", "Chennai, TN", "+91 90000 33001"),
                fields: json!({
                    "name": "Paddy",
                    "variety": "BPT 5204",
                    "pricePerKg": "₹45",
                    "description": "Disease-resistant, 110 days to maturity."
                }),
            },
            Sample {
                owner: ("Pulses Research Center", "Coimbatore, TN", "+91 90000 33002"),
                fields: json!({
                    "name": "Black gram",
                    "variety": "ADT 3",
                    "pricePerKg": "₹120",
                    "description": "85% germination rate."
                }),
            },
        ],
    }
}

/// Sample listings of one kind, newest first.
pub fn sample_listings(kind: ListingKind) -> Vec<ListingRecord> {
    let label = match kind {
        ListingKind::Post => "farmer",
        ListingKind::Tool | ListingKind::Seed => "renter",
    };
    let now = Utc::now();

    samples(kind)
        .into_iter()
        .enumerate()
        .map(|(i, sample)| {
            let mut fields = match sample.fields {
                Value::Object(map) => map,
                _ => Map::new(),
            };
            let (name, location, phone) = sample.owner;
            fields.insert(format!("{}Name", label), json!(name));
            fields.insert(format!("{}Location", label), json!(location));
            fields.insert(format!("{}Phone", label), json!(phone));

            let created_at = now - Duration::hours(i as i64 * 6);
            ListingRecord {
                id: format!("demo-{}-{}", kind.namespace(), i + 1),
                user_id: format!("demo-{}-{}", label, i + 1),
                fields,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}
