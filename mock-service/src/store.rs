//! In-memory users, sessions and cars.
use crate::error::ApiError;
use chrono::{DateTime, Utc};
use rand::{distributions::Alphanumeric, Rng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const ADMIN_EMAIL: &str = "admin@email.com";
pub const ADMIN_PASSWORD: &str = "eutenhoumviolaorosa";

const TOKEN_LEN: usize = 40;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub full_name: String,
    pub email: String,
    #[serde(skip)]
    password: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub owner: String,
    pub brand: String,
    pub model: String,
    pub year: u16,
    pub plate: String,
    pub odometer: i64,
}

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Car payload. Unknown fields (`createdAt`, `owner`, ...) are ignored; the owner is the caller.
#[derive(Debug, Default, Deserialize)]
pub struct NewCar {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub plate: Option<String>,
    pub odometer: Option<i64>,
}

#[derive(Debug)]
pub(crate) struct Store {
    users: HashMap<String, User>,
    /// Bearer token to user id. An account may hold several live sessions.
    tokens: HashMap<String, String>,
    cars: HashMap<String, Car>,
}

impl Store {
    pub fn new() -> Self {
        let mut store = Self {
            users: HashMap::new(),
            tokens: HashMap::new(),
            cars: HashMap::new(),
        };
        store.insert_user("Admin", ADMIN_EMAIL, ADMIN_PASSWORD);
        store
    }

    fn insert_user(&mut self, full_name: &str, email: &str, password: &str) -> User {
        let user = User {
            id: object_id(),
            created_at: Utc::now(),
            full_name: full_name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.users.insert(user.id.clone(), user.clone());
        user
    }

    fn find_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }

    pub fn register(&mut self, new_user: NewUser) -> Result<User, ApiError> {
        let full_name = required(new_user.full_name, "fullName")?;
        let email = required(new_user.email, "email")?;
        let password = required(new_user.password, "password")?;

        if self.find_by_email(&email).is_some() {
            return Err(ApiError::DuplicateEmail(email));
        }
        Ok(self.insert_user(&full_name, &email, &password))
    }

    pub fn login(&mut self, credentials: &Credentials) -> Result<String, ApiError> {
        let email = credentials.email.trim();
        let user_id = match self.find_by_email(email) {
            Some(user) if user.password == credentials.password.trim() => user.id.clone(),
            _ => return Err(ApiError::InvalidCredentials),
        };

        let token = session_token();
        self.tokens.insert(token.clone(), user_id);
        Ok(token)
    }

    /// The user id behind a live token.
    pub fn authenticate(&self, token: &str) -> Option<&str> {
        self.tokens.get(token).map(String::as_str)
    }

    pub fn logout(&mut self, token: &str) {
        self.tokens.remove(token);
    }

    pub fn users(&self) -> Vec<User> {
        let mut users: Vec<_> = self.users.values().cloned().collect();
        users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.email.cmp(&b.email)));
        users
    }

    /// Remove the user along with every session and car it owns.
    pub fn delete_user(&mut self, user_id: &str) {
        self.users.remove(user_id);
        self.tokens.retain(|_, owner| owner != user_id);
        self.cars.retain(|_, car| car.owner != user_id);
    }

    pub fn cars_of(&self, owner: &str) -> Vec<Car> {
        let mut cars: Vec<_> = self
            .cars
            .values()
            .filter(|car| car.owner == owner)
            .cloned()
            .collect();
        cars.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        cars
    }

    pub fn add_car(&mut self, owner: &str, new_car: NewCar) -> Result<Car, ApiError> {
        let car = validate_car(owner, new_car)?;
        if self.cars.values().any(|c| c.plate == car.plate) {
            return Err(ApiError::DuplicatePlate(car.plate));
        }
        self.cars.insert(car.id.clone(), car.clone());
        Ok(car)
    }

    /// Deleting an unknown or foreign car is a no-op.
    pub fn delete_car(&mut self, owner: &str, id: &str) {
        if self.cars.get(id).is_some_and(|car| car.owner == owner) {
            self.cars.remove(id);
        }
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingField(field))
}

fn validate_car(owner: &str, new_car: NewCar) -> Result<Car, ApiError> {
    let NewCar {
        brand: Some(brand),
        model: Some(model),
        year: Some(year),
        plate: Some(plate),
        odometer: Some(odometer),
    } = new_car
    else {
        return Err(ApiError::InvalidCar);
    };

    let valid = !brand.trim().is_empty()
        && !model.trim().is_empty()
        && valid_plate(&plate)
        && year.chars().count() == 4
        && odometer >= 0;
    if !valid {
        return Err(ApiError::InvalidCar);
    }
    let year = year.parse::<u16>().map_err(|_| ApiError::InvalidCar)?;

    Ok(Car {
        id: object_id(),
        created_at: Utc::now(),
        owner: owner.to_string(),
        brand,
        model,
        year,
        plate,
        odometer,
    })
}

/// Eight characters shaped like `ABC-1234`.
fn valid_plate(plate: &str) -> bool {
    let bytes = plate.as_bytes();
    bytes.len() == 8
        && bytes[..3].iter().all(u8::is_ascii_alphabetic)
        && bytes[3] == b'-'
        && bytes[4..].iter().all(u8::is_ascii_digit)
}

/// 24 hex characters, the shape of a document id.
fn object_id() -> String {
    let id: u128 = rand::thread_rng().gen::<u128>() >> 32;
    format!("{id:024x}")
}

fn session_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LEN)
        .map(char::from)
        .collect()
}
