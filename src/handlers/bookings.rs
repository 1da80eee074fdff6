use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::user::UserRole;
use crate::entities::{booking, movie, user};
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::utils::jwt::Claims;
use crate::validation::{ensure_valid, validate_booking};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: i32,
    pub cinema: String,
    pub seat_number: String,
    pub showtime: DateTime<Utc>,
    pub price: Decimal,
    pub movie_id: i32,
    pub movie_title: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct BookingDetailResponse {
    pub id: i32,
    pub cinema: String,
    pub seat_number: String,
    pub showtime: DateTime<Utc>,
    pub price: Decimal,
    pub movie_id: i32,
    pub movie_title: String,
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub created_at: DateTime<Utc>,
}

fn booking_response(b: booking::Model, movie_title: String) -> BookingResponse {
    BookingResponse {
        id: b.id,
        cinema: b.cinema,
        seat_number: b.seat_number,
        showtime: b.showtime.with_timezone(&Utc),
        price: b.price,
        movie_id: b.movie_id,
        movie_title,
        user_id: b.user_id,
        created_at: b.created_at.with_timezone(&Utc),
    }
}

fn detail_response(
    b: booking::Model,
    movie: Option<&movie::Model>,
    user: Option<&user::Model>,
) -> BookingDetailResponse {
    BookingDetailResponse {
        id: b.id,
        cinema: b.cinema,
        seat_number: b.seat_number,
        showtime: b.showtime.with_timezone(&Utc),
        price: b.price,
        movie_id: b.movie_id,
        movie_title: movie.map(|m| m.title.clone()).unwrap_or_default(),
        user_id: b.user_id,
        user_name: user.map(|u| u.full_name.clone()).unwrap_or_default(),
        user_email: user.map(|u| u.email.clone()).unwrap_or_default(),
        created_at: b.created_at.with_timezone(&Utc),
    }
}

/// List all bookings with movie and user loaded (admin)
pub async fn list_all_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingDetailResponse>>> {
    policy::list_all_bookings(&claims).check()?;

    let bookings = booking::Entity::find().all(&state.db).await?;
    let movies = movie::Entity::find().all(&state.db).await?;
    let users = user::Entity::find().all(&state.db).await?;

    let responses: Vec<BookingDetailResponse> = bookings
        .into_iter()
        .map(|b| {
            let movie = movies.iter().find(|m| m.id == b.movie_id);
            let user = users.iter().find(|u| u.id == b.user_id);
            detail_response(b, movie, user)
        })
        .collect();

    Ok(Json(responses))
}

/// List the caller's own bookings
pub async fn my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> AppResult<Json<Vec<BookingResponse>>> {
    let bookings = booking::Entity::find()
        .filter(booking::Column::UserId.eq(claims.sub))
        .all(&state.db)
        .await?;

    let movies = movie::Entity::find().all(&state.db).await?;

    let responses: Vec<BookingResponse> = bookings
        .into_iter()
        .map(|b| {
            let title = movies
                .iter()
                .find(|m| m.id == b.movie_id)
                .map(|m| m.title.clone())
                .unwrap_or_default();
            booking_response(b, title)
        })
        .collect();

    Ok(Json(responses))
}

/// Get booking details. Admins may view any booking, users only their own.
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookingDetailResponse>> {
    let booking = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    policy::view_booking(&claims, booking.user_id).check()?;

    let movie = movie::Entity::find_by_id(booking.movie_id)
        .one(&state.db)
        .await?;
    let user = user::Entity::find_by_id(booking.user_id)
        .one(&state.db)
        .await?;

    Ok(Json(detail_response(booking, movie.as_ref(), user.as_ref())))
}

// ============ Create ============

#[derive(Debug, Deserialize)]
pub struct NewBookingQuery {
    pub movie_id: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct MoviePickerItem {
    pub id: i32,
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct NewBookingResponse {
    pub movie: movie::Model,
    /// Price prefill taken from the movie
    pub price: Decimal,
    pub movies: Vec<MoviePickerItem>,
}

/// Create-form support: the selected movie, a price prefill, and the movie
/// picker list. 404 when no or an unknown movie id is given.
pub async fn new_booking(
    State(state): State<AppState>,
    Query(params): Query<NewBookingQuery>,
) -> AppResult<Json<NewBookingResponse>> {
    let movie_id = params
        .movie_id
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let movie = movie::Entity::find_by_id(movie_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let movies = movie::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|m| MoviePickerItem {
            id: m.id,
            title: m.title,
        })
        .collect();

    Ok(Json(NewBookingResponse {
        price: movie.price,
        movie,
        movies,
    }))
}

#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub movie_id: i32,
    pub cinema: String,
    pub seat_number: String,
    pub showtime: DateTime<Utc>,
    pub price: Decimal,
    /// Accepted but ignored: the booking always belongs to the caller.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Create a booking for the authenticated caller. Any submitted user_id is
/// discarded, whatever the caller's role.
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    ensure_valid(validate_booking(
        &payload.cinema,
        &payload.seat_number,
        payload.price,
    ))?;

    let movie = movie::Entity::find_by_id(payload.movie_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let new_booking = booking::ActiveModel {
        cinema: Set(payload.cinema),
        seat_number: Set(payload.seat_number),
        showtime: Set(payload.showtime.into()),
        price: Set(payload.price),
        user_id: Set(claims.sub),
        movie_id: Set(movie.id),
        ..Default::default()
    };

    let booking = new_booking.insert(&state.db).await?;

    Ok(Json(booking_response(booking, movie.title)))
}

// ============ Edit ============

#[derive(Debug, Deserialize)]
pub struct UpdateBookingRequest {
    pub id: i32,
    pub movie_id: i32,
    pub cinema: String,
    pub seat_number: String,
    pub showtime: DateTime<Utc>,
    pub price: Decimal,
    /// Only honored for admins; other callers keep the original owner.
    #[serde(default)]
    pub user_id: Option<Uuid>,
}

/// Update a booking. The path id must match the body id. Authorization is
/// decided against the stored row's owner, never the submitted body.
pub async fn update_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateBookingRequest>,
) -> AppResult<Json<BookingResponse>> {
    if id != payload.id {
        return Err(AppError::NotFound("Booking not found".to_string()));
    }

    let original = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    policy::edit_booking(&claims, original.user_id).check()?;

    // Non-admins cannot reassign a booking to someone else
    let user_id = if claims.role == UserRole::Admin {
        payload.user_id.unwrap_or(original.user_id)
    } else {
        original.user_id
    };

    if user_id != original.user_id {
        user::Entity::find_by_id(user_id)
            .one(&state.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
    }

    ensure_valid(validate_booking(
        &payload.cinema,
        &payload.seat_number,
        payload.price,
    ))?;

    let movie = movie::Entity::find_by_id(payload.movie_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let mut active: booking::ActiveModel = original.into();
    active.cinema = Set(payload.cinema);
    active.seat_number = Set(payload.seat_number);
    active.showtime = Set(payload.showtime.into());
    active.price = Set(payload.price);
    active.user_id = Set(user_id);
    active.movie_id = Set(movie.id);

    match active.update(&state.db).await {
        Ok(updated) => Ok(Json(booking_response(updated, movie.title))),
        // Concurrent delete/change between load and save: NotFound if the
        // row is gone, otherwise a typed conflict.
        Err(DbErr::RecordNotUpdated) => {
            let still_there = booking::Entity::find_by_id(id).one(&state.db).await?;
            match still_there {
                None => Err(AppError::NotFound("Booking not found".to_string())),
                Some(_) => Err(AppError::Conflict(
                    "Booking was modified concurrently".to_string(),
                )),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Cancel a booking. Owner only; existence and ownership are re-checked on
/// the row as stored.
pub async fn delete_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    let booking = booking::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

    policy::delete_booking(&claims, booking.user_id).check()?;

    booking::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(serde_json::json!({ "message": "Booking cancelled" })))
}

#[cfg(all(test, feature = "mock"))]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    use crate::config::Config;
    use crate::entities::movie::Genre;

    fn test_config() -> Config {
        Config {
            database_url: "postgres://localhost/test".to_string(),
            jwt_secret: "secret".to_string(),
            jwt_expiration_hours: 24,
            server_host: "127.0.0.1".to_string(),
            server_port: 3000,
        }
    }

    fn claims(role: UserRole) -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            email: "caller@example.com".to_string(),
            role,
            exp: Utc::now().timestamp() + 3600,
            iat: Utc::now().timestamp(),
        }
    }

    fn movie_row(id: i32) -> movie::Model {
        movie::Model {
            id,
            title: "The Matrix".to_string(),
            description: "A computer hacker learns the true nature of his reality.".to_string(),
            genre: Genre::SciFi,
            price: Decimal::new(1299, 2),
            duration: 136,
            showtimes: "[]".to_string(),
            created_at: Utc::now().into(),
        }
    }

    fn booking_row(id: i32, owner: Uuid, movie_id: i32) -> booking::Model {
        booking::Model {
            id,
            cinema: "Cinema City 1".to_string(),
            seat_number: "A1".to_string(),
            showtime: Utc::now().into(),
            price: Decimal::new(1299, 2),
            user_id: owner,
            movie_id,
            created_at: Utc::now().into(),
        }
    }

    #[tokio::test]
    async fn test_create_forces_caller_ownership() {
        let caller = claims(UserRole::User);
        let spoofed = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![movie_row(1)]])
            .append_query_results([vec![booking_row(1, caller.sub, 1)]])
            .into_connection();
        let state = AppState {
            db,
            config: test_config(),
        };

        let payload = CreateBookingRequest {
            movie_id: 1,
            cinema: "Cinema City 1".to_string(),
            seat_number: "A1".to_string(),
            showtime: Utc::now(),
            price: Decimal::new(1299, 2),
            user_id: Some(spoofed),
        };

        create_booking(State(state.clone()), Extension(caller.clone()), Json(payload))
            .await
            .unwrap();

        // The insert must carry the caller's id, never the submitted one
        let log = format!("{:?}", state.db.into_transaction_log());
        assert!(log.contains(&caller.sub.to_string()));
        assert!(!log.contains(&spoofed.to_string()));
    }

    #[tokio::test]
    async fn test_update_id_mismatch_is_not_found_without_store_access() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let state = AppState {
            db,
            config: test_config(),
        };
        let caller = claims(UserRole::User);

        let payload = UpdateBookingRequest {
            id: 2,
            movie_id: 1,
            cinema: "Cinema City 1".to_string(),
            seat_number: "A1".to_string(),
            showtime: Utc::now(),
            price: Decimal::new(1299, 2),
            user_id: None,
        };

        let err = update_booking(State(state.clone()), Extension(caller), Path(1), Json(payload))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(state.db.into_transaction_log().is_empty());
    }

    #[tokio::test]
    async fn test_non_admin_update_keeps_original_owner() {
        let caller = claims(UserRole::User);
        let spoofed = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![booking_row(1, caller.sub, 1)]])
            .append_query_results([vec![movie_row(1)]])
            .append_query_results([vec![booking_row(1, caller.sub, 1)]])
            .into_connection();
        let state = AppState {
            db,
            config: test_config(),
        };

        let payload = UpdateBookingRequest {
            id: 1,
            movie_id: 1,
            cinema: "Cinema City 2".to_string(),
            seat_number: "B2".to_string(),
            showtime: Utc::now(),
            price: Decimal::new(1499, 2),
            user_id: Some(spoofed),
        };

        let updated =
            update_booking(State(state.clone()), Extension(caller.clone()), Path(1), Json(payload))
                .await
                .unwrap();

        assert_eq!(updated.0.user_id, caller.sub);

        // The reassignment attempt never reaches the store
        let log = format!("{:?}", state.db.into_transaction_log());
        assert!(!log.contains(&spoofed.to_string()));
    }
}
