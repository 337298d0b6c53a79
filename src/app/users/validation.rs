//! 用户请求校验
//!
//! 校验直接作用于原始 JSON，这样类型错误也能以字段错误的形式返回，而不是整体的反序列化失败。

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};

use super::model::{NewUser, UserPatch};
use crate::core::error::{CoreError, FieldError};

pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 50;
pub const CITY_MIN_LEN: usize = 2;
pub const AGE_MIN: i64 = 1;
pub const AGE_MAX: i64 = 150;

const KNOWN_FIELDS: [&str; 5] = ["name", "email", "age", "city", "isActive"];

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$")
            .unwrap();
    static ref ID_RE: Regex = Regex::new(r"^\d+$").unwrap();
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// 解析路径中的用户 ID。非数字返回 400；数字但超出 `u64` 范围的视为不存在
pub fn parse_user_id(raw: &str) -> Result<u64, CoreError> {
    if !ID_RE.is_match(raw) {
        return Err(CoreError::InvalidId(raw.to_string()));
    }
    raw.parse::<u64>()
        .map_err(|_| CoreError::NotFound(raw.to_string()))
}

pub fn validate_create(body: &Value) -> Result<NewUser, CoreError> {
    let map = as_object(body)?;
    let mut errors = unknown_fields(map);

    let name = field(map, "name", true, check_name, &mut errors);
    let email = field(map, "email", true, check_email, &mut errors);
    let age = field(map, "age", true, check_age, &mut errors);
    let city = field(map, "city", true, check_city, &mut errors);
    let is_active = field(map, "isActive", false, check_bool, &mut errors);

    match (name, email, age, city) {
        (Some(name), Some(email), Some(age), Some(city)) if errors.is_empty() => Ok(NewUser {
            name,
            email,
            age,
            city,
            is_active: is_active.unwrap_or(true),
        }),
        _ => Err(CoreError::Validation(sorted(errors))),
    }
}

pub fn validate_update(body: &Value) -> Result<UserPatch, CoreError> {
    let map = as_object(body)?;
    let mut errors = unknown_fields(map);

    let patch = UserPatch {
        name: field(map, "name", false, check_name, &mut errors),
        email: field(map, "email", false, check_email, &mut errors),
        age: field(map, "age", false, check_age, &mut errors),
        city: field(map, "city", false, check_city, &mut errors),
        is_active: field(map, "isActive", false, check_bool, &mut errors),
    };

    if !errors.is_empty() {
        return Err(CoreError::Validation(sorted(errors)));
    }
    if patch.is_empty() {
        return Err(CoreError::validation(
            "body",
            "at least one field must be provided",
        ));
    }
    Ok(patch)
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, CoreError> {
    body.as_object()
        .ok_or_else(|| CoreError::validation("body", "request body must be a JSON object"))
}

fn unknown_fields(map: &Map<String, Value>) -> Vec<FieldError> {
    map.keys()
        .filter(|k| !KNOWN_FIELDS.contains(&k.as_str()))
        .map(|k| FieldError::new(k.as_str(), format!("{} is not allowed", k)))
        .collect()
}

/// 已知字段按声明顺序排在前面，未知字段随后
fn sorted(mut errors: Vec<FieldError>) -> Vec<FieldError> {
    errors.sort_by_key(|e| {
        KNOWN_FIELDS
            .iter()
            .position(|f| *f == e.field)
            .unwrap_or(KNOWN_FIELDS.len())
    });
    errors
}

fn field<T>(
    map: &Map<String, Value>,
    key: &str,
    required: bool,
    check: fn(&Value) -> Result<T, String>,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    match map.get(key) {
        None if required => {
            errors.push(FieldError::new(key, format!("{} is required", key)));
            None
        }
        None => None,
        Some(value) => match check(value) {
            Ok(v) => Some(v),
            Err(message) => {
                errors.push(FieldError::new(key, message));
                None
            }
        },
    }
}

fn check_name(value: &Value) -> Result<String, String> {
    let name = value
        .as_str()
        .ok_or_else(|| "name must be a string".to_string())?
        .trim();
    let len = name.chars().count();
    if len < NAME_MIN_LEN {
        return Err(format!(
            "name must be at least {} characters long",
            NAME_MIN_LEN
        ));
    }
    if len > NAME_MAX_LEN {
        return Err(format!(
            "name must be at most {} characters long",
            NAME_MAX_LEN
        ));
    }
    Ok(name.to_string())
}

fn check_email(value: &Value) -> Result<String, String> {
    let email = value
        .as_str()
        .ok_or_else(|| "email must be a string".to_string())?
        .trim();
    if !is_valid_email(email) {
        return Err("email must be a valid email address".to_string());
    }
    Ok(email.to_string())
}

fn check_age(value: &Value) -> Result<u32, String> {
    let out_of_range = || format!("age must be between {} and {}", AGE_MIN, AGE_MAX);
    let age = match value {
        Value::Number(n) => match (n.as_i64(), n.as_u64()) {
            (Some(age), _) => age,
            (None, Some(_)) => return Err(out_of_range()),
            (None, None) => return Err("age must be an integer".to_string()),
        },
        _ => return Err("age must be a number".to_string()),
    };
    if !(AGE_MIN..=AGE_MAX).contains(&age) {
        return Err(out_of_range());
    }
    Ok(age as u32)
}

fn check_city(value: &Value) -> Result<String, String> {
    let city = value
        .as_str()
        .ok_or_else(|| "city must be a string".to_string())?
        .trim();
    if city.chars().count() < CITY_MIN_LEN {
        return Err(format!(
            "city must be at least {} characters long",
            CITY_MIN_LEN
        ));
    }
    Ok(city.to_string())
}

fn check_bool(value: &Value) -> Result<bool, String> {
    value
        .as_bool()
        .ok_or_else(|| "isActive must be a boolean".to_string())
}
