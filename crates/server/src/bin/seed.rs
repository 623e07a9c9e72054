//! Populate a fresh database with demo accounts, forums and journals.
//!
//! Everything is written inside one transaction. Accounts and forums that
//! already exist are left alone, so running the seeder twice is harmless.

use chrono::{Days, NaiveDate, NaiveTime, Utc};
use sahemind_common::{Config, IdGenerator};
use sahemind_core::hash_password;
use sahemind_db::entities::{
    forum, forum_moderator, journal, post, post_like, post_response, response_like, user,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, Set,
    TransactionTrait, prelude::DateTimeWithTimeZone,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const MODERATOR_PASSWORD: &str = "moderator123";
const VOLUNTEER_PASSWORD: &str = "volunteer123";
const PATIENT_PASSWORD: &str = "patient123";

struct SeedUser {
    email: &'static str,
    name: &'static str,
    role: &'static str,
    keywords: &'static [&'static str],
}

struct SeedForum {
    name: &'static str,
    description: &'static str,
    thematic: &'static str,
    /// Indexes into the moderator list.
    moderators: &'static [usize],
    posts: &'static [SeedPost],
}

struct SeedPost {
    title: &'static str,
    content: &'static str,
    is_anonymous: bool,
    responses: &'static [&'static str],
}

const MODERATORS: &[SeedUser] = &[
    SeedUser {
        email: "moderator1@sahemind.com",
        name: "Salma",
        role: user::ROLE_MODERATOR,
        keywords: &[],
    },
    SeedUser {
        email: "moderator2@sahemind.com",
        name: "Youssef",
        role: user::ROLE_MODERATOR,
        keywords: &[],
    },
];

const VOLUNTEERS: &[SeedUser] = &[
    SeedUser {
        email: "volunteer1@sahemind.com",
        name: "Ines",
        role: user::ROLE_VOLUNTEER,
        keywords: &["anxiety", "stress"],
    },
    SeedUser {
        email: "volunteer2@sahemind.com",
        name: "Karim",
        role: user::ROLE_VOLUNTEER,
        keywords: &["sadness", "loneliness"],
    },
    SeedUser {
        email: "volunteer3@sahemind.com",
        name: "Nour",
        role: user::ROLE_VOLUNTEER,
        keywords: &["anger", "stress"],
    },
];

const PATIENT: SeedUser = SeedUser {
    email: "patient@sahemind.com",
    name: "Amal",
    role: user::ROLE_PATIENT,
    keywords: &["stress"],
};

const FORUMS: &[SeedForum] = &[
    SeedForum {
        name: "Mental Health Support",
        description: "A safe space to share your thoughts, feelings and experiences.",
        thematic: "Mental Health",
        moderators: &[0],
        posts: &[SeedPost {
            title: "First time posting here",
            content: "I have been struggling lately and did not know where else to write this.",
            is_anonymous: true,
            responses: &[
                "Welcome. Writing it down is already a step.",
                "You are not alone, we are here to listen.",
            ],
        }],
    },
    SeedForum {
        name: "Anxiety & Stress Management",
        description: "Strategies and support for managing anxiety and stress in daily life.",
        thematic: "Anxiety",
        moderators: &[0, 1],
        posts: &[SeedPost {
            title: "Breathing exercises that help me",
            content: "Box breathing before exams has made a real difference for me.",
            is_anonymous: false,
            responses: &["Thanks for sharing, I will try it tonight."],
        }],
    },
    SeedForum {
        name: "Depression Support Group",
        description: "A supportive community for those dealing with depression.",
        thematic: "Depression",
        moderators: &[1],
        posts: &[],
    },
];

/// `(humor, title, content, is_pinned, color, days ago)`
const JOURNALS: &[(&str, &str, &str, bool, &str, u64)] = &[
    (
        "happy",
        "A calmer morning",
        "Ten minutes of meditation and the day already feels lighter.",
        true,
        "#ff6b6b",
        3,
    ),
    (
        "anxious",
        "Exam week",
        "Breaking the work into small pieces is helping.",
        false,
        "#4ecdc4",
        2,
    ),
    (
        "anxious",
        "Still exam week",
        "Slept badly but managed two study sessions.",
        false,
        "#45b7d1",
        1,
    ),
    (
        "grateful",
        "Small wins",
        "Called a friend I had not spoken to in months.",
        true,
        "#f7dc6f",
        0,
    ),
];

/// Return the id of the account with `seed.email`, creating it when missing.
async fn ensure_user(
    txn: &DatabaseTransaction,
    id_gen: &IdGenerator,
    seed: &SeedUser,
    password: &str,
    availability: Option<(NaiveDate, NaiveTime, NaiveTime)>,
) -> anyhow::Result<(String, bool)> {
    if let Some(existing) = user::Entity::find()
        .filter(user::Column::Email.eq(seed.email))
        .one(txn)
        .await?
    {
        info!(email = seed.email, "Account exists, skipping");
        return Ok((existing.id, false));
    }

    let model = user::ActiveModel {
        id: Set(id_gen.generate()),
        email: Set(seed.email.to_string()),
        password_hash: Set(hash_password(password)?),
        name: Set(Some(seed.name.to_string())),
        role: Set(seed.role.to_string()),
        emotion_keywords: Set(seed.keywords.iter().map(ToString::to_string).collect()),
        is_active: Set(true),
        token: Set(None),
        availability_date: Set(availability.map(|(d, _, _)| d)),
        availability_start: Set(availability.map(|(_, s, _)| s)),
        availability_end: Set(availability.map(|(_, _, e)| e)),
        created_at: Set(Utc::now().into()),
        updated_at: Set(None),
    };
    let created = model.insert(txn).await?;
    info!(email = seed.email, role = seed.role, "Created account");
    Ok((created.id, true))
}

async fn seed_forum(
    txn: &DatabaseTransaction,
    id_gen: &IdGenerator,
    seed: &SeedForum,
    moderator_ids: &[String],
    member_ids: &[String],
) -> anyhow::Result<bool> {
    if forum::Entity::find()
        .filter(forum::Column::Name.eq(seed.name))
        .one(txn)
        .await?
        .is_some()
    {
        info!(forum = seed.name, "Forum exists, skipping");
        return Ok(false);
    }

    let forum = forum::ActiveModel {
        id: Set(id_gen.generate()),
        name: Set(seed.name.to_string()),
        description: Set(Some(seed.description.to_string())),
        thematic: Set(seed.thematic.to_string()),
        is_active: Set(true),
        created_at: Set(Utc::now().into()),
    }
    .insert(txn)
    .await?;

    for &idx in seed.moderators {
        let Some(moderator_id) = moderator_ids.get(idx) else {
            continue;
        };
        forum_moderator::ActiveModel {
            id: Set(id_gen.generate()),
            forum_id: Set(forum.id.clone()),
            user_id: Set(moderator_id.clone()),
            assigned_at: Set(Utc::now().into()),
        }
        .insert(txn)
        .await?;
    }

    for (i, seed_post) in seed.posts.iter().enumerate() {
        let Some(author_id) = member_ids.get(i % member_ids.len().max(1)) else {
            continue;
        };
        let post = post::ActiveModel {
            id: Set(id_gen.generate()),
            forum_id: Set(forum.id.clone()),
            author_id: Set(author_id.clone()),
            title: Set(seed_post.title.to_string()),
            content: Set(seed_post.content.to_string()),
            is_anonymous: Set(seed_post.is_anonymous),
            is_reported: Set(false),
            report_reason: Set(None),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        }
        .insert(txn)
        .await?;

        // Everyone except the author likes the post.
        for liker in member_ids.iter().filter(|id| *id != author_id) {
            post_like::ActiveModel {
                id: Set(id_gen.generate()),
                post_id: Set(post.id.clone()),
                user_id: Set(liker.clone()),
                created_at: Set(Utc::now().into()),
            }
            .insert(txn)
            .await?;
        }

        for (j, content) in seed_post.responses.iter().enumerate() {
            let Some(responder) = member_ids.get((i + j + 1) % member_ids.len()) else {
                continue;
            };
            let response = post_response::ActiveModel {
                id: Set(id_gen.generate()),
                post_id: Set(post.id.clone()),
                author_id: Set(responder.clone()),
                content: Set((*content).to_string()),
                is_anonymous: Set(false),
                is_reported: Set(false),
                report_reason: Set(None),
                created_at: Set(Utc::now().into()),
                updated_at: Set(None),
            }
            .insert(txn)
            .await?;

            response_like::ActiveModel {
                id: Set(id_gen.generate()),
                response_id: Set(response.id),
                user_id: Set(author_id.clone()),
                created_at: Set(Utc::now().into()),
            }
            .insert(txn)
            .await?;
        }
    }

    info!(forum = seed.name, posts = seed.posts.len(), "Created forum");
    Ok(true)
}

async fn seed_journals(
    txn: &DatabaseTransaction,
    id_gen: &IdGenerator,
    user_id: &str,
) -> anyhow::Result<()> {
    let now = Utc::now();
    for &(humor, title, content, is_pinned, color, days_ago) in JOURNALS {
        let at: DateTimeWithTimeZone = now
            .checked_sub_days(Days::new(days_ago))
            .unwrap_or(now)
            .into();
        journal::ActiveModel {
            id: Set(id_gen.generate()),
            user_id: Set(user_id.to_string()),
            humor: Set(humor.to_string()),
            title: Set(Some(title.to_string())),
            content: Set(Some(content.to_string())),
            is_pinned: Set(is_pinned),
            color: Set(color.to_string()),
            report: Set(false),
            created_at: Set(at),
            updated_at: Set(at),
        }
        .insert(txn)
        .await?;
    }
    info!(count = JOURNALS.len(), "Created journals");
    Ok(())
}

async fn seed(txn: &DatabaseTransaction, config: &Config) -> anyhow::Result<()> {
    let id_gen = IdGenerator::new();
    let tz = config.volunteers.tz()?;
    let today = Utc::now().with_timezone(&tz).date_naive();
    let tomorrow = today.succ_opt().unwrap_or(today);

    let mut moderator_ids = Vec::with_capacity(MODERATORS.len());
    for seed in MODERATORS {
        let (id, _) = ensure_user(txn, &id_gen, seed, MODERATOR_PASSWORD, None).await?;
        moderator_ids.push(id);
    }

    let mut member_ids = Vec::with_capacity(VOLUNTEERS.len() + 1);
    for (i, seed) in VOLUNTEERS.iter().enumerate() {
        // Alternate between a window today and one tomorrow.
        let date = if i % 2 == 0 { today } else { tomorrow };
        let window = (
            date,
            NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
            NaiveTime::from_hms_opt(21, 0, 0).unwrap_or_default(),
        );
        let (id, _) = ensure_user(txn, &id_gen, seed, VOLUNTEER_PASSWORD, Some(window)).await?;
        member_ids.push(id);
    }

    let (patient_id, patient_created) =
        ensure_user(txn, &id_gen, &PATIENT, PATIENT_PASSWORD, None).await?;
    member_ids.push(patient_id.clone());

    for seed_forum_def in FORUMS {
        seed_forum(txn, &id_gen, seed_forum_def, &moderator_ids, &member_ids).await?;
    }

    if patient_created {
        seed_journals(txn, &id_gen, &patient_id).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sahemind=info,sahemind_seed=info".into()),
        )
        .init();

    let config = Config::discover()?;
    let db = sahemind_db::init(&config.database).await?;
    sahemind_db::migrate(&db).await?;

    let txn = db.begin().await?;
    match seed(&txn, &config).await {
        Ok(()) => {
            txn.commit().await?;
            info!("Seeding complete");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Seeding failed, rolling back");
            txn.rollback().await?;
            Err(e)
        }
    }
}
