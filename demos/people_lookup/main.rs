//! People lookup example
//!
//! This example demonstrates:
//! - Declaring lookup records with column metadata
//! - Loading lookup settings from YAML
//! - Serving several lookups through a registry
//! - Search, id and additional-filter requests
//!
//! Run with `RUST_LOG=lookup=debug cargo run --example people_lookup` to see
//! the pipeline stages.

use lookup::prelude::*;
use tracing_subscriber::EnvFilter;

impl_lookup_record!(
    Person,
    "person",
    {
        id: i64,
        name: String => { position: 1, label: "Name" },
        email: Option<String> => { position: 2, label: "Email" },
        country: String => { position: 3, label: "Country" },
        joined_on: NaiveDate => { format: "{0:dd MMM yyyy}", label: "Joined" },
        credit: f64 => { format: "{0:#,##0.00}" },
    }
);

impl_lookup_record!(
    Country,
    "country",
    id = code,
    {
        code: String => { label: "Code" },
        name: String => { position: 0, label: "Country" },
    }
);

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

fn people() -> Vec<Person> {
    vec![
        Person::new(5, "Ann".into(), Some("ann@example.com".into()), "BE".into(), date(2021, 3, 14), 1250.5),
        Person::new(2, "Bob".into(), None, "NL".into(), date(2019, 11, 2), 87.0),
        Person::new(9, "Joanna".into(), Some("jo@example.org".into()), "BE".into(), date(2023, 6, 30), 40210.0),
        Person::new(3, "Carl".into(), Some("carl@annex.io".into()), "FR".into(), date(2020, 1, 8), 0.25),
    ]
}

fn countries() -> Vec<Country> {
    vec![
        Country::new("BE".into(), "Belgium".into()),
        Country::new("FR".into(), "France".into()),
        Country::new("NL".into(), "Netherlands".into()),
    ]
}

fn print_data(label: &str, data: &LookupData) -> Result<()> {
    println!("\n=== {label} ({} matching) ===", data.filtered_rows);
    println!("{}", serde_json::to_string_pretty(&data.rows)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/people_lookup/lookups.yaml");
    let config = LookupsConfig::from_yaml_file(config_path)?;

    let mut registry = LookupRegistry::new();
    registry.register(BoundLookup::new(
        "people",
        Lookup::<Person>::new()?.with_config(config.lookup("people"))?,
        InMemoryRecordSource::with_records(people()),
    ));
    registry.register(BoundLookup::new(
        "countries",
        Lookup::<Country>::new()?.with_config(config.lookup("countries"))?,
        InMemoryRecordSource::with_records(countries()),
    ));

    println!("Registered lookups: {:?}", registry.names());

    let data = registry
        .get_data("people", &LookupFilter::by_search("ann").with_page(0, 10))
        .await?;
    print_data("people: search 'ann'", &data)?;

    let filter = LookupFilter::new()
        .with_additional_filter("country", Some(FieldValue::String("BE".into())))
        .with_sort("joined_on", SortOrder::Desc);
    let data = registry.get_data("people", &filter).await?;
    print_data("people: country = BE, newest first", &data)?;

    let data = registry.get_data("countries", &LookupFilter::by_id("NL")).await?;
    print_data("countries: id NL", &data)?;

    match registry.get_data("people", &LookupFilter::by_id("ann")).await {
        Ok(_) => println!("\nUnexpected match for a non-numeric id"),
        Err(err) => println!("\n{} -> {}", err.error_code(), err),
    }

    if let Some(people) = registry.get("people") {
        println!("\nColumns of '{}':", people.name());
        println!("{}", serde_json::to_string_pretty(people.columns())?);
    }

    Ok(())
}
