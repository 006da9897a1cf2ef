use card_advisor::{
    config::Settings,
    models::{FinancialProfile, Frequency, InterfaceState, TurnRole},
    RecommendationPipeline, SessionRegistry,
};
use chrono::Utc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Card Advisor starting");

    let settings = Settings::from_env()?;
    if settings.openai_api_key.is_none() {
        warn!("OPENAI_API_KEY not set, recommendations will run in degraded mode");
    }

    let pipeline = RecommendationPipeline::from_settings(&settings).await?;
    let sessions = SessionRegistry::from_settings(&settings)?;

    // Sample profile
    let user_id = Uuid::new_v4();
    let profile = FinancialProfile {
        profile_id: Uuid::new_v4(),
        user_id,
        annual_income: 92_000.0,
        credit_score: 735,
        spending_categories: ["dining", "travel", "groceries"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        travel_frequency: Frequency::Frequently,
        dining_frequency: Frequency::Occasionally,
        preferred_benefits: ["airport lounge access", "no foreign transaction fees"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        updated_at: Utc::now(),
    };

    info!(profile_id = %profile.profile_id, "Running recommendation");

    match pipeline.recommend_default(&profile).await {
        Ok(result) => {
            println!("\n=== RECOMMENDATIONS ===");
            println!("Mode: {:?}", result.mode);
            println!("Fingerprint: {}", result.query_fingerprint);
            for (rank, card) in result.cards.iter().enumerate() {
                let eligible = if card.is_eligible_for(&profile) { "" } else { " (not eligible)" };
                println!(
                    "  {:>2}. {} {} (fee ${:.0}){}",
                    rank + 1,
                    card.issuer,
                    card.name,
                    card.annual_fee,
                    eligible
                );
            }
        }
        Err(e) if e.is_unavailable() => {
            eprintln!("Recommendations are temporarily unavailable: {}", e);
        }
        Err(e) => return Err(e.into()),
    }

    // Sample chat
    let session_id = sessions.start_session(user_id).await;
    let chat = [
        (TurnRole::User, "Which card is best for my trip to Dubai?"),
        (TurnRole::Assistant, "A travel card with lounge access fits your profile."),
        (TurnRole::User, "great, can you find me a flight there?"),
        (TurnRole::User, "and book it for next Friday"),
    ];

    println!("\n=== CHAT ===");
    for (role, text) in chat {
        let update = sessions.handle_message(session_id, role, text, None).await?;
        println!(
            "  {:?}: {:<55} -> panel={} intent={:?}",
            role, text, update.state, update.intent
        );
    }

    let update = sessions.navigate(session_id, InterfaceState::Hotel).await?;
    println!("  [navigate hotel] -> panel={}", update.state);

    Ok(())
}
