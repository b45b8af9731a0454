use super::store::{ContentStore, UserStore};
use crate::{
    error::AppResult,
    models::{ContentType, NewContent, NewUser, UserPreferences},
    services::auth::hash_password,
};

/// Demo accounts as (email, username, password)
pub const DEMO_USERS: [(&str, &str, &str); 2] = [
    ("demo@example.com", "demouser", "demo123"),
    ("curator@example.com", "contentcurator", "curator123"),
];

fn sample(
    title: &str,
    description: &str,
    content_type: ContentType,
    category: &str,
    tags: &[&str],
    duration: Option<u32>,
) -> NewContent {
    let slug = title.to_lowercase().replace(' ', "-");
    NewContent {
        title: title.to_string(),
        description: description.to_string(),
        content_type,
        url: format!("https://media.example.com/{}", slug),
        category: category.to_string(),
        tags: tags.iter().map(|t| t.to_string()).collect(),
        thumbnail: Some(format!("https://media.example.com/thumbs/{}.jpg", slug)),
        duration,
    }
}

/// Sample catalogue inserted alongside the demo accounts
pub fn demo_catalogue() -> Vec<NewContent> {
    vec![
        sample(
            "Getting Started with Rust",
            "A practical introduction to ownership and borrowing",
            ContentType::Video,
            "Technology",
            &["rust", "programming", "tutorial"],
            Some(1260),
        ),
        sample(
            "The Future of AI Assistants",
            "How language models are changing everyday software",
            ContentType::Article,
            "Technology",
            &["ai", "machine-learning"],
            None,
        ),
        sample(
            "Indie Film Festival Highlights",
            "Our favourite short films from this year's festival",
            ContentType::Video,
            "Entertainment",
            &["film", "festival"],
            Some(840),
        ),
        sample(
            "Startup Funding Explained",
            "Seed rounds, dilution and term sheets in plain language",
            ContentType::Podcast,
            "Business",
            &["startups", "finance"],
            Some(2700),
        ),
        sample(
            "Morning Yoga Routine",
            "Fifteen minutes of stretching to start the day",
            ContentType::Video,
            "Health",
            &["yoga", "fitness"],
            Some(900),
        ),
        sample(
            "Mountain Sunrise",
            "Long exposure photograph taken above the clouds",
            ContentType::Image,
            "Entertainment",
            &["photography", "nature"],
            None,
        ),
        sample(
            "Championship Recap",
            "Every decisive moment from the final match",
            ContentType::Article,
            "Sports",
            &["football", "highlights"],
            None,
        ),
        sample(
            "Lo-fi Beats for Coding",
            "Two hours of calm instrumentals for deep work",
            ContentType::Podcast,
            "Music",
            &["lofi", "focus", "programming"],
            Some(7200),
        ),
    ]
}

/// Inserts the demo accounts and sample catalogue into empty stores
///
/// Stores that already hold data are left untouched, so running this on
/// every startup is safe.
pub async fn seed_demo_data(content: &dyn ContentStore, users: &dyn UserStore) -> AppResult<()> {
    if users.count().await? == 0 {
        for (email, username, password) in DEMO_USERS {
            users
                .create(NewUser {
                    email: email.to_string(),
                    username: username.to_string(),
                    password_hash: hash_password(password)?,
                    preferences: UserPreferences::default(),
                })
                .await?;
        }
        tracing::info!(count = DEMO_USERS.len(), "Seeded demo users");
    }

    if content.totals().await?.count == 0 {
        let catalogue = demo_catalogue();
        let count = catalogue.len();
        for item in catalogue {
            content.create(item).await?;
        }
        tracing::info!(count, "Seeded demo content");
    }

    Ok(())
}
