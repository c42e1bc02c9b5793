//! Static payloads sent by the fleet tasks.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// The account every simulated user logs in as.
pub const ADMIN: Credentials<'static> = Credentials {
    email: "admin@email.com",
    password: "eutenhoumviolaorosa",
};

/// Owner record embedded in the car fixtures.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Owner {
    #[serde(rename = "_id")]
    pub id: &'static str,
    pub created_at: DateTime<Utc>,
    pub full_name: &'static str,
    pub birth_date: DateTime<Utc>,
    pub cnh_expiration: DateTime<Utc>,
    pub email: &'static str,
    pub password: &'static str,
}

pub fn user() -> Owner {
    let now = Utc::now();
    Owner {
        id: "test",
        created_at: now,
        full_name: "John Doe",
        birth_date: now,
        cnh_expiration: now,
        email: "john@mail.com",
        password: "john123",
    }
}

/// Registration payload. Dates are plain `YYYY-MM-DD HH:MM:SS` strings.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub full_name: &'static str,
    pub birth_date: &'static str,
    pub cnh_expiration: &'static str,
    pub email: &'static str,
    pub password: &'static str,
}

impl NewUser {
    pub fn credentials(&self) -> Credentials<'static> {
        Credentials {
            email: self.email,
            password: self.password,
        }
    }
}

pub fn user2() -> NewUser {
    NewUser {
        full_name: "John Doe",
        birth_date: "1992-03-03 00:00:00",
        cnh_expiration: "2020-01-01 00:00:00",
        email: "john@mail.com",
        password: "john123",
    }
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCar {
    pub created_at: DateTime<Utc>,
    pub owner: Owner,
    pub brand: &'static str,
    pub model: &'static str,
    pub year: &'static str,
    pub plate: &'static str,
    pub odometer: i64,
}

pub fn car() -> NewCar {
    NewCar {
        created_at: Utc::now(),
        owner: user(),
        brand: "Volkswagen",
        model: "Gol",
        year: "2018",
        plate: "XXX-1999",
        odometer: 10000,
    }
}

pub fn car2() -> NewCar {
    NewCar {
        created_at: Utc::now(),
        owner: user(),
        brand: "Ford",
        model: "Focus",
        year: "2018",
        plate: "XXX-0000",
        odometer: 2,
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CarRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub odometer: i64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub full_name: String,
    pub email: String,
}
