//! Route handlers for the birthday pages.
//!
//! Every handler reaches the database through the [`Store`] capability on
//! [`AppState`] and the external providers through their fetch traits, so the
//! whole surface can be exercised without live collaborators.

use std::collections::HashMap;
use std::str::FromStr;

use axum::{
    extract::{Form, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use minijinja::context;

use crate::{
    AppState,
    api::models::birthdays::{BirthdayDetailsRequest, BirthdayUpdateRequest, CredentialRequest},
    db::{
        BirthdayId,
        models::{birthdays::BirthdayCreateDBRequest, credentials::CredentialCreateDBRequest},
    },
    errors::{Error, Result},
    views,
};

/// Milliseconds in a 365.25-day year. Ages floor against this instead of real
/// calendars; existing records were computed this way, so parity wins.
const APPROX_YEAR_MS: i64 = 31_557_600_000;

/// The astronomy archive starts in 1996; earlier years are queried as 1996
/// while the submitted year is stored unchanged.
fn apod_year(year: i32) -> i32 {
    year.max(1996)
}

/// Age in whole approximate years at `now`, or `None` when the components do
/// not form a real calendar date.
pub(crate) fn age_on(now: DateTime<Utc>, year: i32, month: u32, day: u32) -> Option<i64> {
    let birth = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(0, 0, 0)?.and_utc();
    Some((now - birth).num_milliseconds().div_euclid(APPROX_YEAR_MS))
}

fn parse_component<T: FromStr>(raw: &str, field: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| Error::BadRequest {
        message: format!("{field} must be a number"),
    })
}

/// GET `/` - every saved record plus the count.
#[tracing::instrument(skip_all)]
pub async fn list_birthdays(State(state): State<AppState>) -> Result<Html<String>> {
    let birthdays = state.store.list_birthdays().await?;

    views::render(
        "index.html",
        context! {
            count => birthdays.len(),
            birthdays => birthdays,
        },
    )
}

/// POST `/details` - fetch both provider payloads for the submitted date,
/// kick off persistence, and render the assembled record.
#[tracing::instrument(skip_all)]
pub async fn create_with_details(
    State(state): State<AppState>,
    Form(form): Form<BirthdayDetailsRequest>,
) -> Result<Response> {
    let day: u32 = parse_component(&form.day, "day")?;
    let month: u32 = parse_component(&form.month, "month")?;
    let year: i32 = parse_component(&form.year, "year")?;

    let apod_date = format!("{:04}-{:02}-{:02}", apod_year(year), month, day);

    let age = age_on(Utc::now(), year, month, day).ok_or_else(|| Error::BadRequest {
        message: format!("{}-{}-{} is not a calendar date", form.year, form.month, form.day),
    })?;

    // The two fetches are dependent in sequence on purpose: the stored record
    // must combine exactly one astronomy payload with one fact payload, and
    // either failure aborts the request before anything is persisted.
    let apod = state.apod.fetch(&apod_date).await.map_err(Error::Provider)?;
    let fact = state.date_facts.fetch(month, day).await.map_err(Error::Provider)?;

    let birthday = BirthdayCreateDBRequest {
        birth_day: form.day.clone(),
        birth_month: form.month.clone(),
        birth_year: form.year.clone(),
        nasa_name: apod.title,
        nasa_url: apod.hdurl,
        fact_year: fact.year,
        fact_text: fact.text,
    };
    let credential = CredentialCreateDBRequest {
        user_name: form.user_name.clone(),
        user_password: form.user_password.clone(),
    };

    // Persist without holding up the response; a failure only reaches the log.
    let store = state.store.clone();
    let record = birthday.clone();
    tokio::spawn(async move {
        if let Err(e) = store.save_birthday(&record, &credential).await {
            tracing::error!("Failed to persist birthday: {:#}", e);
        }
    });

    let page = views::render(
        "details.html",
        context! {
            birthday => birthday,
            age => age,
            planet => form.planets,
            user => context! {
                name => form.user_name,
                password => form.user_password,
            },
        },
    )?;

    Ok(page.into_response())
}

/// POST `/selection` - pure pass-through of whatever was submitted.
#[tracing::instrument(skip_all)]
pub async fn stage_selection(Form(data): Form<HashMap<String, String>>) -> Result<Html<String>> {
    views::render("selection.html", context! { data => data })
}

/// GET `/selection/{id}` - one record, or the empty selection page.
#[tracing::instrument(skip_all)]
pub async fn get_birthday(State(state): State<AppState>, Path(id): Path<BirthdayId>) -> Result<Html<String>> {
    let birthday = state.store.get_birthday(id).await?;

    views::render("selection.html", context! { data => birthday })
}

/// PUT `/selection/{id}` - rename the astronomy title of an owned record.
#[tracing::instrument(skip_all)]
pub async fn update_birthday(
    State(state): State<AppState>,
    Path(id): Path<BirthdayId>,
    Form(form): Form<BirthdayUpdateRequest>,
) -> Result<Response> {
    let Some(credential) = state.store.find_credential(&form.user_name, &form.user_password).await? else {
        return Err(Error::InvalidCredentials);
    };

    if credential.birthday_id != id {
        return Err(Error::Forbidden { id });
    }

    let updated = state
        .store
        .update_nasa_name(credential.birthday_id, &form.nasa_name)
        .await?
        .ok_or_else(|| Error::NotFound {
            resource: "Birthday".to_string(),
            id: id.to_string(),
        })?;

    Ok(Redirect::to(&format!("/selection/{}", updated.id)).into_response())
}

/// DELETE `/selection/{id}` - remove an owned record and its credential.
#[tracing::instrument(skip_all)]
pub async fn delete_birthday(
    State(state): State<AppState>,
    Path(id): Path<BirthdayId>,
    Form(form): Form<CredentialRequest>,
) -> Result<Response> {
    let Some(credential) = state.store.find_credential(&form.user_name, &form.user_password).await? else {
        return Err(Error::InvalidCredentials);
    };

    if credential.birthday_id != id {
        return Err(Error::Forbidden { id });
    }

    state.store.delete_birthday_and_credential(&credential).await?;

    Ok(Redirect::to("/").into_response())
}

/// Catch-all for every unmatched route.
#[tracing::instrument(skip_all)]
pub async fn not_found() -> Result<Response> {
    let page = views::render("error.html", context! {})?;

    Ok((StatusCode::NOT_FOUND, page).into_response())
}
