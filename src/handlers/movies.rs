use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;

use crate::entities::movie::{self, Genre};
use crate::error::{AppError, AppResult};
use crate::policy;
use crate::utils::jwt::Claims;
use crate::validation::{ensure_valid, validate_movie};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct MovieListQuery {
    pub sort_order: Option<String>,
    pub genre_filter: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub price: Decimal,
    pub duration: i32,
    #[serde(default)]
    pub showtimes: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub genre: Genre,
    pub price: Decimal,
    pub duration: i32,
    #[serde(default)]
    pub showtimes: String,
}

/// Match a genre filter against the closed vocabulary. Unknown values yield
/// None and the caller skips the filter entirely.
pub fn parse_genre(value: &str) -> Option<Genre> {
    match value {
        "Action" => Some(Genre::Action),
        "Animation" => Some(Genre::Animation),
        "Comedy" => Some(Genre::Comedy),
        "Drama" => Some(Genre::Drama),
        "Horror" => Some(Genre::Horror),
        "Romance" => Some(Genre::Romance),
        "SciFi" => Some(Genre::SciFi),
        "Thriller" => Some(Genre::Thriller),
        _ => None,
    }
}

/// List the catalog, optionally filtered by genre and sorted.
/// Anonymous access.
pub async fn list_movies(
    State(state): State<AppState>,
    Query(params): Query<MovieListQuery>,
) -> AppResult<Json<Vec<movie::Model>>> {
    let mut query = movie::Entity::find();

    // Unparseable genre values are silently ignored
    if let Some(genre) = params.genre_filter.as_deref().and_then(parse_genre) {
        query = query.filter(movie::Column::Genre.eq(genre));
    }

    let query = match params.sort_order.as_deref() {
        Some("title_desc") => query.order_by_desc(movie::Column::Title),
        Some("genre") => query.order_by_asc(movie::Column::Genre),
        Some("genre_desc") => query.order_by_desc(movie::Column::Genre),
        _ => query.order_by_asc(movie::Column::Title),
    };

    let movies = query.all(&state.db).await?;
    Ok(Json(movies))
}

/// Get movie details. Anonymous access.
pub async fn get_movie(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<movie::Model>> {
    let movie = movie::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    Ok(Json(movie))
}

/// Create a movie (admin)
pub async fn create_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateMovieRequest>,
) -> AppResult<Json<movie::Model>> {
    policy::manage_movies(&claims).check()?;

    ensure_valid(validate_movie(
        &payload.title,
        &payload.description,
        payload.price,
        payload.duration,
    ))?;

    let movie = movie::ActiveModel {
        title: Set(payload.title),
        description: Set(payload.description),
        genre: Set(payload.genre),
        price: Set(payload.price),
        duration: Set(payload.duration),
        showtimes: Set(payload.showtimes),
        ..Default::default()
    };

    let result = movie.insert(&state.db).await?;
    Ok(Json(result))
}

/// Update a movie (admin). The path id must match the body id.
pub async fn update_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMovieRequest>,
) -> AppResult<Json<movie::Model>> {
    if id != payload.id {
        return Err(AppError::NotFound("Movie not found".to_string()));
    }

    policy::manage_movies(&claims).check()?;

    ensure_valid(validate_movie(
        &payload.title,
        &payload.description,
        payload.price,
        payload.duration,
    ))?;

    let movie = movie::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Movie not found".to_string()))?;

    let mut active: movie::ActiveModel = movie.into();
    active.title = Set(payload.title);
    active.description = Set(payload.description);
    active.genre = Set(payload.genre);
    active.price = Set(payload.price);
    active.duration = Set(payload.duration);
    active.showtimes = Set(payload.showtimes);

    match active.update(&state.db).await {
        Ok(updated) => Ok(Json(updated)),
        // The row changed underneath us between load and save: report
        // NotFound if it is gone, otherwise a typed conflict.
        Err(DbErr::RecordNotUpdated) => {
            let still_there = movie::Entity::find_by_id(id).one(&state.db).await?;
            match still_there {
                None => Err(AppError::NotFound("Movie not found".to_string())),
                Some(_) => Err(AppError::Conflict(
                    "Movie was modified concurrently".to_string(),
                )),
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Delete a movie (admin). Removes the row if it still exists; succeeds
/// either way, matching the confirm-then-redirect flow. Bookings for the
/// movie go with it via the cascade.
pub async fn delete_movie(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i32>,
) -> AppResult<Json<serde_json::Value>> {
    policy::manage_movies(&claims).check()?;

    movie::Entity::delete_by_id(id).exec(&state.db).await?;

    Ok(Json(serde_json::json!({ "message": "Movie deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_genre_known_values() {
        assert_eq!(parse_genre("SciFi"), Some(Genre::SciFi));
        assert_eq!(parse_genre("Drama"), Some(Genre::Drama));
        assert_eq!(parse_genre("Animation"), Some(Genre::Animation));
    }

    #[test]
    fn test_parse_genre_unknown_values_ignored() {
        assert_eq!(parse_genre("scifi"), None);
        assert_eq!(parse_genre("Sci-Fi"), None);
        assert_eq!(parse_genre("Western"), None);
        assert_eq!(parse_genre(""), None);
    }
}
