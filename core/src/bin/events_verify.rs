use events_core::{Api, EventFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "events_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let api = Api::from_env()?;
    let config = api.config();
    println!("Base URL:  {}", config.base_url);
    println!("Mode:      {:?}", config.mode);
    println!("Runtime:   {:?}", config.runtime);
    println!("Healthy:   {}", api.health_check());

    match api.get_categories() {
        Ok(categories) => println!("Categories: {}", categories.len()),
        Err(err) => println!("Categories: {} ({err})", err.user_message()),
    }
    match api.get_events(&EventFilter::default()) {
        Ok(events) => println!("Events:     {}", events.len()),
        Err(err) => println!("Events:     {} ({err})", err.user_message()),
    }
    Ok(())
}
