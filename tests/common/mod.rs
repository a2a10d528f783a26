#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, HeaderMap, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use serde_json::{json, Value};

use atlas::models::{
    CardioSet, CompetitionGroup, ExerciseLog, GroupMember, Reminder, SetLog, StrengthSet,
    WorkoutPackage, WorkoutSession,
};
use atlas::ApiClient;

pub const TEST_TOKEN: &str = "test-token";
pub const TEST_PASSWORD: &str = "secret";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
}

#[derive(Default)]
pub struct FakeState {
    pub sessions: BTreeMap<String, WorkoutSession>,
    pub requests: Vec<RecordedRequest>,
    pub puts: Vec<Vec<ExerciseLog>>,
    pub bodies: Vec<(String, Value)>,
    pub packages: BTreeMap<String, WorkoutPackage>,
    pub groups: BTreeMap<String, CompetitionGroup>,
    pub reminders: BTreeMap<String, Reminder>,
    pub water_ml: f64,
    pub weights: Vec<f64>,
    pub fail_writes: bool,
}

/// In-process stand-in for the Atlas REST API.
#[derive(Clone, Default)]
pub struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    pub fn with_packages(self, packages: Vec<WorkoutPackage>) -> Self {
        {
            let mut state = self.state.lock();
            for package in packages {
                state.packages.insert(package.id.clone(), package);
            }
        }
        self
    }

    pub fn with_groups(self, groups: Vec<CompetitionGroup>) -> Self {
        {
            let mut state = self.state.lock();
            for group in groups {
                state.groups.insert(group.id.clone(), group);
            }
        }
        self
    }

    pub fn with_sessions(sessions: Vec<WorkoutSession>) -> Self {
        let api = Self::default();
        {
            let mut state = api.state.lock();
            for session in sessions {
                state.sessions.insert(session.id.clone(), session);
            }
        }
        api
    }

    pub fn session(&self, id: &str) -> Option<WorkoutSession> {
        self.state.lock().sessions.get(id).cloned()
    }

    pub fn puts(&self) -> Vec<Vec<ExerciseLog>> {
        self.state.lock().puts.clone()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// JSON bodies received on `path`, oldest first.
    pub fn bodies(&self, path: &str) -> Vec<Value> {
        self.state
            .lock()
            .bodies
            .iter()
            .filter(|(p, _)| p == path)
            .map(|(_, body)| body.clone())
            .collect()
    }

    pub fn packages(&self) -> Vec<WorkoutPackage> {
        self.state.lock().packages.values().cloned().collect()
    }

    pub fn groups(&self) -> Vec<CompetitionGroup> {
        self.state.lock().groups.values().cloned().collect()
    }

    pub fn reminders(&self) -> Vec<Reminder> {
        self.state.lock().reminders.values().cloned().collect()
    }

    pub fn water_ml(&self) -> f64 {
        self.state.lock().water_ml
    }

    pub fn weights(&self) -> Vec<f64> {
        self.state.lock().weights.clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.state.lock().fail_writes = fail;
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/auth/login", post(login))
            .route("/auth/me", get(me).put(update_me))
            .route("/exercises", get(exercises))
            .route("/sessions/all", get(list_sessions))
            .route(
                "/sessions/{id}",
                get(get_session).put(put_session).delete(delete_session),
            )
            .route("/sessions/{id}/complete", post(complete_session))
            .route("/analytics/calendar", get(calendar))
            .route("/analytics/stats", get(stats))
            .route("/analytics/water/stats", get(water_stats))
            .route("/analytics/water/recommendation", get(water_recommendation))
            .route("/auth/me/change-password", post(change_password))
            .route("/packages", get(list_packages).post(create_package))
            .route("/packages/public", get(public_packages))
            .route("/packages/join", post(join_package))
            .route("/packages/{id}", axum::routing::put(update_package).delete(delete_package))
            .route("/packages/{id}/copy", post(copy_package))
            .route("/groups", get(list_groups).post(create_group))
            .route("/groups/join", post(join_group))
            .route("/groups/{id}", get(get_group).delete(delete_group))
            .route("/groups/{id}/leave", post(leave_group))
            .route("/reminders", get(list_reminders).post(create_reminder))
            .route("/reminders/today", get(todays_reminders))
            .route(
                "/reminders/{id}",
                axum::routing::put(update_reminder).delete(delete_reminder),
            )
            .route("/water", post(log_water))
            .route("/weight", post(log_weight))
            .layer(middleware::from_fn_with_state(self.clone(), record_and_authorize))
            .with_state(self.clone())
    }

    /// Serves the fake API on an ephemeral port and returns its base URL.
    pub async fn spawn(&self) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().unwrap();
        let app = self.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }
}

pub async fn spawn_api(sessions: Vec<WorkoutSession>) -> (FakeApi, ApiClient) {
    let api = FakeApi::with_sessions(sessions);
    let base_url = api.spawn().await;
    let client = ApiClient::new(&base_url, Some(TEST_TOKEN.to_string()))
        .expect("Failed to create API client");
    (api, client)
}

async fn record_and_authorize(State(api): State<FakeApi>, req: Request, next: Next) -> Response {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let path = req.uri().path().to_string();
    api.state.lock().requests.push(RecordedRequest {
        method: req.method().clone(),
        path: path.clone(),
        authorization: authorization.clone(),
    });

    let expected = format!("Bearer {TEST_TOKEN}");
    if path != "/auth/login" && authorization.as_deref() != Some(expected.as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Not authenticated"})),
        )
            .into_response();
    }
    next.run(req).await
}

fn test_user() -> Value {
    json!({
        "id": "u1",
        "email": "ana@example.com",
        "username": "ana",
        "name": "Ana",
        "created_at": "2025-01-01T00:00:00"
    })
}

#[derive(Deserialize)]
struct LoginBody {
    email: String,
    password: String,
}

async fn login(Json(body): Json<LoginBody>) -> Response {
    if body.email != "ana@example.com" || body.password != TEST_PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Incorrect email or password"})),
        )
            .into_response();
    }
    Json(json!({
        "access_token": TEST_TOKEN,
        "token_type": "bearer",
        "user": test_user()
    }))
    .into_response()
}

async fn me(_headers: HeaderMap) -> Json<Value> {
    Json(test_user())
}

async fn exercises() -> Json<Value> {
    Json(json!([
        {"id": "bench", "name": "Supino Reto", "category": "chest", "type": "strength",
         "muscle_groups": ["chest", "triceps"], "equipment": "barbell"},
        {"id": "squat", "name": "Agachamento", "category": "legs", "type": "strength",
         "muscle_groups": ["quads"]},
        {"id": "run", "name": "Esteira", "category": "cardio", "type": "cardio",
         "muscle_groups": []}
    ]))
}

async fn list_sessions(State(api): State<FakeApi>) -> Json<Vec<WorkoutSession>> {
    Json(api.state.lock().sessions.values().cloned().collect())
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Session not found"})),
    )
        .into_response()
}

async fn get_session(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    match api.session(&id) {
        Some(session) => Json(session).into_response(),
        None => not_found(),
    }
}

async fn put_session(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = api.state.lock();
    if state.fail_writes {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Database unavailable"})),
        )
            .into_response();
    }
    let exercises: Vec<ExerciseLog> = match serde_json::from_value(body["exercises"].clone()) {
        Ok(exercises) => exercises,
        Err(e) => {
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"detail": e.to_string()})),
            )
                .into_response()
        }
    };
    state.puts.push(exercises.clone());
    match state.sessions.get_mut(&id) {
        Some(session) => {
            session.exercise_count = Some(exercises.len() as u32);
            session.exercises = exercises;
            Json(session.clone()).into_response()
        }
        None => not_found(),
    }
}

async fn complete_session(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    let mut state = api.state.lock();
    if state.fail_writes {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Database unavailable"})),
        )
            .into_response();
    }
    match state.sessions.get_mut(&id) {
        Some(session) if session.is_completed => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Session already completed"})),
        )
            .into_response(),
        Some(session) => {
            session.is_completed = true;
            session.end_time = Some(chrono::Utc::now());
            session.duration_minutes = Some(45.0);
            Json(json!({"message": "Session completed"})).into_response()
        }
        None => not_found(),
    }
}

async fn delete_session(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    let mut state = api.state.lock();
    if state.fail_writes {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Database unavailable"})),
        )
            .into_response();
    }
    match state.sessions.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => not_found(),
    }
}

#[derive(Deserialize)]
struct CalendarQuery {
    year: i32,
    month: u32,
}

async fn calendar(Query(query): Query<CalendarQuery>) -> Json<Value> {
    let day = format!("{:04}-{:02}-15", query.year, query.month);
    let mut calendar_data = serde_json::Map::new();
    calendar_data.insert(
        day,
        json!([{"id": "s1", "package_name": "Treino A", "duration_minutes": 50.0}]),
    );
    Json(json!({ "calendar_data": calendar_data }))
}

async fn update_me(State(api): State<FakeApi>, Json(body): Json<Value>) -> Json<Value> {
    api.state.lock().bodies.push(("/auth/me".to_string(), body.clone()));
    let mut user = test_user();
    if let (Some(user), Some(changes)) = (user.as_object_mut(), body.as_object()) {
        for (key, value) in changes {
            user.insert(key.clone(), value.clone());
        }
    }
    Json(user)
}

async fn change_password(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    api.state
        .lock()
        .bodies
        .push(("/auth/me/change-password".to_string(), body.clone()));
    if body["current_password"] != TEST_PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Current password is incorrect"})),
        )
            .into_response();
    }
    Json(json!({"message": "Password updated"})).into_response()
}

async fn stats(Query(query): Query<DaysQuery>) -> Json<Value> {
    Json(json!({
        "total_workouts": query.days.min(3),
        "total_duration_minutes": 150.0,
        "average_duration_minutes": 50.0,
        "workouts_by_day": {"2025-03-01": 1, "2025-03-03": 2}
    }))
}

#[derive(Deserialize)]
struct DaysQuery {
    days: u32,
}

async fn water_stats(State(api): State<FakeApi>, Query(_query): Query<DaysQuery>) -> Json<Value> {
    let today = chrono::Local::now().date_naive().to_string();
    let mut stats = serde_json::Map::new();
    stats.insert(today, json!(api.water_ml()));
    Json(Value::Object(stats))
}

async fn water_recommendation() -> Json<Value> {
    Json(json!({"recommendation_ml": 2500.0}))
}

async fn log_water(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    let Some(amount) = body["amount_ml"].as_f64().filter(|ml| *ml > 0.0) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "amount_ml must be positive"})),
        )
            .into_response();
    };
    api.state.lock().water_ml += amount;
    (StatusCode::CREATED, Json(json!({"amount_ml": amount}))).into_response()
}

async fn log_weight(State(api): State<FakeApi>, Json(body): Json<Value>) -> Json<Value> {
    if let Some(weight) = body["weight"].as_f64() {
        api.state.lock().weights.push(weight);
    }
    Json(body)
}

fn next_id(prefix: &str, taken: usize) -> String {
    format!("{prefix}{}", taken + 1)
}

async fn list_packages(State(api): State<FakeApi>) -> Json<Vec<WorkoutPackage>> {
    Json(
        api.packages()
            .into_iter()
            .filter(|p| p.is_owned_by("u1"))
            .collect(),
    )
}

async fn public_packages(State(api): State<FakeApi>) -> Json<Vec<WorkoutPackage>> {
    Json(api.packages().into_iter().filter(|p| p.is_public).collect())
}

fn package_from(id: String, user_id: &str, body: &Value) -> Option<WorkoutPackage> {
    let mut value = body.clone();
    let object = value.as_object_mut()?;
    object.insert("id".to_string(), json!(id));
    object.insert("user_id".to_string(), json!(user_id));
    serde_json::from_value(value).ok()
}

async fn create_package(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    let mut state = api.state.lock();
    state.bodies.push(("/packages".to_string(), body.clone()));
    let id = next_id("p", state.packages.len());
    match package_from(id.clone(), "u1", &body) {
        Some(package) => {
            state.packages.insert(id, package.clone());
            (StatusCode::CREATED, Json(package)).into_response()
        }
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"detail": "invalid package"})),
        )
            .into_response(),
    }
}

async fn update_package(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = api.state.lock();
    state.bodies.push((format!("/packages/{id}"), body.clone()));
    if !state.packages.contains_key(&id) {
        return package_not_found();
    }
    match package_from(id.clone(), "u1", &body) {
        Some(package) => {
            state.packages.insert(id, package.clone());
            Json(package).into_response()
        }
        None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

fn package_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Package not found"})),
    )
        .into_response()
}

async fn delete_package(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    match api.state.lock().packages.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => package_not_found(),
    }
}

async fn copy_package(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    let mut state = api.state.lock();
    let Some(source) = state.packages.get(&id).cloned() else {
        return package_not_found();
    };
    let copy_id = next_id("p", state.packages.len());
    let copy = WorkoutPackage {
        id: copy_id.clone(),
        user_id: Some("u1".to_string()),
        is_public: false,
        ..source
    };
    state.packages.insert(copy_id, copy.clone());
    (StatusCode::CREATED, Json(copy)).into_response()
}

async fn join_package(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    let code = body["package_code"].as_str().unwrap_or_default().to_string();
    api.state.lock().bodies.push(("/packages/join".to_string(), body));
    if api.state.lock().packages.contains_key(&code) {
        Json(json!({"message": "Package added"})).into_response()
    } else {
        (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Invalid package code"})),
        )
            .into_response()
    }
}

async fn list_groups(State(api): State<FakeApi>) -> Json<Vec<CompetitionGroup>> {
    Json(api.groups())
}

fn group_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Group not found"})),
    )
        .into_response()
}

async fn get_group(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    match api.state.lock().groups.get(&id) {
        Some(group) => Json(group.clone()).into_response(),
        None => group_not_found(),
    }
}

async fn create_group(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    let mut state = api.state.lock();
    let id = next_id("g", state.groups.len());
    let group = CompetitionGroup {
        id: id.clone(),
        name: body["name"].as_str().unwrap_or_default().to_string(),
        description: body["description"].as_str().map(str::to_string),
        owner_id: "u1".to_string(),
        members: vec![GroupMember {
            user_id: "u1".to_string(),
            username: "ana".to_string(),
            joined_at: None,
            workout_count: 0,
        }],
        invite_code: format!("INV{id}"),
        created_at: None,
    };
    state.groups.insert(id, group.clone());
    (StatusCode::CREATED, Json(group)).into_response()
}

async fn join_group(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    let code = body["invite_code"].as_str().unwrap_or_default();
    let mut state = api.state.lock();
    let Some(group) = state.groups.values_mut().find(|g| g.invite_code == code) else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "Invalid invite code"})),
        )
            .into_response();
    };
    if group.member("u1").is_some() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "Already a member"})),
        )
            .into_response();
    }
    group.members.push(GroupMember {
        user_id: "u1".to_string(),
        username: "ana".to_string(),
        joined_at: None,
        workout_count: 0,
    });
    Json(json!({"message": "Joined group"})).into_response()
}

async fn leave_group(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    let mut state = api.state.lock();
    let Some(group) = state.groups.get_mut(&id) else {
        return group_not_found();
    };
    group.members.retain(|m| m.user_id != "u1");
    Json(json!({"message": "Left group"})).into_response()
}

async fn delete_group(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    let mut state = api.state.lock();
    match state.groups.get(&id).map(|g| g.is_owner("u1")) {
        Some(false) => (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "Only the owner can delete the group"})),
        )
            .into_response(),
        Some(true) => {
            state.groups.remove(&id);
            StatusCode::NO_CONTENT.into_response()
        }
        None => group_not_found(),
    }
}

async fn list_reminders(State(api): State<FakeApi>) -> Json<Vec<Reminder>> {
    Json(api.reminders())
}

async fn todays_reminders(State(api): State<FakeApi>) -> Json<Vec<Reminder>> {
    Json(
        api.reminders()
            .into_iter()
            .map(|r| Reminder {
                completed: Some(false),
                ..r
            })
            .collect(),
    )
}

fn reminder_from(id: String, body: &Value) -> Option<Reminder> {
    let mut value = body.clone();
    value.as_object_mut()?.insert("id".to_string(), json!(id));
    serde_json::from_value(value).ok()
}

async fn create_reminder(State(api): State<FakeApi>, Json(body): Json<Value>) -> Response {
    let mut state = api.state.lock();
    state.bodies.push(("/reminders".to_string(), body.clone()));
    let id = next_id("r", state.reminders.len());
    match reminder_from(id.clone(), &body) {
        Some(reminder) => {
            state.reminders.insert(id, reminder.clone());
            (StatusCode::CREATED, Json(reminder)).into_response()
        }
        None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn update_reminder(
    State(api): State<FakeApi>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = api.state.lock();
    if !state.reminders.contains_key(&id) {
        return StatusCode::NOT_FOUND.into_response();
    }
    match reminder_from(id.clone(), &body) {
        Some(reminder) => {
            state.reminders.insert(id, reminder.clone());
            Json(reminder).into_response()
        }
        None => StatusCode::UNPROCESSABLE_ENTITY.into_response(),
    }
}

async fn delete_reminder(State(api): State<FakeApi>, Path(id): Path<String>) -> Response {
    match api.state.lock().reminders.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn sample_package(id: &str, user_id: &str, is_public: bool) -> WorkoutPackage {
    serde_json::from_value(json!({
        "id": id,
        "user_id": user_id,
        "name": format!("Pacote {id}"),
        "exercises": [
            {"exercise_id": "bench", "order": 1, "notes": "Pegada fechada"},
            {"exercise_id": "squat", "order": 2}
        ],
        "is_public": is_public
    }))
    .expect("valid package")
}

// Test data creation helpers
pub fn sample_session(id: &str, is_completed: bool) -> WorkoutSession {
    WorkoutSession {
        id: id.to_string(),
        user_id: Some("u1".to_string()),
        package_id: Some("p1".to_string()),
        package_name: "Treino A".to_string(),
        exercises: vec![
            ExerciseLog {
                exercise_id: "bench".to_string(),
                exercise_name: "Supino Reto".to_string(),
                sets: SetLog::Strength(vec![StrengthSet {
                    set_number: 1,
                    weight: 60.0,
                    reps: 10,
                    completed: true,
                }]),
                notes: Some("Pegada fechada".to_string()),
            },
            ExerciseLog {
                exercise_id: "run".to_string(),
                exercise_name: "Esteira".to_string(),
                sets: SetLog::Cardio(vec![CardioSet {
                    duration_minutes: 10.0,
                    distance: Some(1.5),
                    incline: None,
                    speed: Some(9.0),
                    completed: false,
                }]),
                notes: None,
            },
        ],
        start_time: chrono::Utc::now(),
        end_time: None,
        duration_minutes: None,
        total_calories: None,
        exercise_count: Some(2),
        is_completed,
        created_at: None,
    }
}
