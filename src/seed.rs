//! One-time fixture loader: admin account, sample customers, the fixed
//! movie catalog, and a couple of demo bookings. Every step is guarded by
//! an existence check so re-running is a no-op.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, NaiveTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::Serialize;
use uuid::Uuid;

use crate::entities::booking;
use crate::entities::movie::{self, Genre};
use crate::entities::user::{self, UserRole};
use crate::error::{AppError, AppResult};

pub const ADMIN_EMAIL: &str = "admin@showtime.com";

/// One entry inside a movie's serialized showtimes blob.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowtimeSlot {
    pub date_time: DateTime<Utc>,
    pub cinema: &'static str,
    pub available_seats: Vec<&'static str>,
}

pub struct MovieFixture {
    pub title: &'static str,
    pub description: &'static str,
    pub genre: Genre,
    pub price: Decimal,
    pub duration: i32,
    pub showtimes: Vec<ShowtimeSlot>,
}

fn at(days: i64, hours: i64) -> DateTime<Utc> {
    let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
    midnight + Duration::days(days) + Duration::hours(hours)
}

pub fn movie_fixtures() -> Vec<MovieFixture> {
    vec![
        MovieFixture {
            title: "The Matrix",
            description: "A computer hacker learns from mysterious rebels about the true nature of his reality.",
            genre: Genre::SciFi,
            price: Decimal::new(1299, 2),
            duration: 136,
            showtimes: vec![
                ShowtimeSlot {
                    date_time: at(1, 18),
                    cinema: "Cinema City 1",
                    available_seats: vec!["A1", "A2", "A3", "B1", "B2", "B3", "C1", "C2", "C3"],
                },
                ShowtimeSlot {
                    date_time: at(2, 20),
                    cinema: "Cinema City 2",
                    available_seats: vec!["A4", "A5", "A6", "B4", "B5", "B6", "C4", "C5", "C6"],
                },
            ],
        },
        MovieFixture {
            title: "The Dark Knight",
            description: "Batman sets out to dismantle the remaining criminal organizations that plague the streets.",
            genre: Genre::Action,
            price: Decimal::new(1499, 2),
            duration: 152,
            showtimes: vec![
                ShowtimeSlot {
                    date_time: at(1, 19),
                    cinema: "Cinema City 1",
                    available_seats: vec!["D1", "D2", "D3", "E1", "E2", "E3", "F1", "F2", "F3"],
                },
                ShowtimeSlot {
                    date_time: at(3, 21),
                    cinema: "Cinema City 3",
                    available_seats: vec!["D4", "D5", "D6", "E4", "E5", "E6", "F4", "F5", "F6"],
                },
            ],
        },
        MovieFixture {
            title: "Inception",
            description: "A thief who steals corporate secrets through dream-sharing technology.",
            genre: Genre::Thriller,
            price: Decimal::new(1399, 2),
            duration: 148,
            showtimes: vec![
                ShowtimeSlot {
                    date_time: at(2, 17),
                    cinema: "Cinema City 2",
                    available_seats: vec!["G1", "G2", "G3", "H1", "H2", "H3", "I1", "I2", "I3"],
                },
                ShowtimeSlot {
                    date_time: at(4, 19),
                    cinema: "Cinema City 1",
                    available_seats: vec!["G4", "G5", "G6", "H4", "H5", "H6", "I4", "I5", "I6"],
                },
            ],
        },
        MovieFixture {
            title: "Toy Story",
            description: "A cowboy doll is profoundly threatened when a new spaceman figure supplants him.",
            genre: Genre::Animation,
            price: Decimal::new(999, 2),
            duration: 81,
            showtimes: vec![
                ShowtimeSlot {
                    date_time: at(1, 14),
                    cinema: "Cinema City 3",
                    available_seats: vec!["J1", "J2", "J3", "K1", "K2", "K3", "L1", "L2", "L3"],
                },
                ShowtimeSlot {
                    date_time: at(3, 16),
                    cinema: "Cinema City 2",
                    available_seats: vec!["J4", "J5", "J6", "K4", "K5", "K6", "L4", "L5", "L6"],
                },
            ],
        },
        MovieFixture {
            title: "The Shawshank Redemption",
            description: "Two imprisoned men bond over a number of years, finding solace and eventual redemption.",
            genre: Genre::Drama,
            price: Decimal::new(1199, 2),
            duration: 142,
            showtimes: vec![
                ShowtimeSlot {
                    date_time: at(2, 18),
                    cinema: "Cinema City 1",
                    available_seats: vec!["M1", "M2", "M3", "N1", "N2", "N3", "O1", "O2", "O3"],
                },
                ShowtimeSlot {
                    date_time: at(5, 20),
                    cinema: "Cinema City 3",
                    available_seats: vec!["M4", "M5", "M6", "N4", "N5", "N6", "O4", "O5", "O6"],
                },
            ],
        },
    ]
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

pub async fn run(db: &DatabaseConnection) -> AppResult<()> {
    seed_admin(db).await?;
    seed_customers(db).await?;
    seed_movies(db).await?;
    seed_bookings(db).await?;
    Ok(())
}

async fn seed_user(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    full_name: &str,
    phone: &str,
    role: UserRole,
) -> AppResult<()> {
    let existing = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?;

    if existing.is_none() {
        let account = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.to_string()),
            password_hash: Set(hash_password(password)?),
            full_name: Set(full_name.to_string()),
            phone: Set(phone.to_string()),
            role: Set(role),
            ..Default::default()
        };
        account.insert(db).await?;
        tracing::info!("Seeded account: {}", email);
    }

    Ok(())
}

async fn seed_admin(db: &DatabaseConnection) -> AppResult<()> {
    seed_user(
        db,
        ADMIN_EMAIL,
        "Admin123!",
        "System Administrator",
        "555-0100",
        UserRole::Admin,
    )
    .await
}

async fn seed_customers(db: &DatabaseConnection) -> AppResult<()> {
    seed_user(
        db,
        "alice@example.com",
        "User123!",
        "Alice Johnson",
        "555-0101",
        UserRole::User,
    )
    .await?;
    seed_user(
        db,
        "bob@example.com",
        "User123!",
        "Bob Smith",
        "555-0102",
        UserRole::User,
    )
    .await
}

async fn seed_movies(db: &DatabaseConnection) -> AppResult<()> {
    if movie::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    for fixture in movie_fixtures() {
        let showtimes = serde_json::to_string(&fixture.showtimes)
            .map_err(|e| AppError::Internal(format!("Failed to serialize showtimes: {}", e)))?;

        let entry = movie::ActiveModel {
            title: Set(fixture.title.to_string()),
            description: Set(fixture.description.to_string()),
            genre: Set(fixture.genre),
            price: Set(fixture.price),
            duration: Set(fixture.duration),
            showtimes: Set(showtimes),
            ..Default::default()
        };
        entry.insert(db).await?;
    }

    tracing::info!("Seeded movie catalog");
    Ok(())
}

async fn seed_bookings(db: &DatabaseConnection) -> AppResult<()> {
    if booking::Entity::find().count(db).await? > 0 {
        return Ok(());
    }

    let admin = user::Entity::find()
        .filter(user::Column::Email.eq(ADMIN_EMAIL))
        .one(db)
        .await?;
    let movies = movie::Entity::find().all(db).await?;

    let (Some(admin), [first, second, ..]) = (admin, movies.as_slice()) else {
        return Ok(());
    };

    let samples = [
        ("Cinema City 1", "A1", at(1, 18), Decimal::new(1299, 2), first.id),
        ("Cinema City 2", "D2", at(3, 21), Decimal::new(1499, 2), second.id),
    ];

    for (cinema, seat, showtime, price, movie_id) in samples {
        let entry = booking::ActiveModel {
            cinema: Set(cinema.to_string()),
            seat_number: Set(seat.to_string()),
            showtime: Set(showtime.into()),
            price: Set(price),
            user_id: Set(admin.id),
            movie_id: Set(movie_id),
            ..Default::default()
        };
        entry.insert(db).await?;
    }

    tracing::info!("Seeded sample bookings");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{validate_booking, validate_movie};

    #[test]
    fn test_fixture_catalog_passes_validation() {
        let fixtures = movie_fixtures();
        assert_eq!(fixtures.len(), 5);

        for f in &fixtures {
            let errors = validate_movie(f.title, f.description, f.price, f.duration);
            assert!(errors.is_empty(), "{}: {:?}", f.title, errors);
        }
    }

    #[test]
    fn test_fixture_seats_match_booking_format() {
        for f in movie_fixtures() {
            for slot in &f.showtimes {
                for seat in &slot.available_seats {
                    assert!(
                        validate_booking(slot.cinema, seat, f.price).is_empty(),
                        "bad fixture seat {}",
                        seat
                    );
                }
            }
        }
    }

    #[test]
    fn test_showtime_slot_serializes_camel_case() {
        let slot = ShowtimeSlot {
            date_time: Utc::now(),
            cinema: "Cinema City 1",
            available_seats: vec!["A1", "A2"],
        };

        let json = serde_json::to_value(&slot).unwrap();
        assert!(json.get("dateTime").is_some());
        assert!(json.get("availableSeats").is_some());
        assert_eq!(json["cinema"], "Cinema City 1");
    }
}
