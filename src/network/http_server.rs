use crate::db::Roster;
use crate::error::Result;
use crate::network::http_models::{
    frequency_to_json, json_to_insert_data, parse_param_value, projection_to_json, record_to_json,
    view_to_json, ApiResponse,
};
use crate::projection;
use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer, Responder};
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};
use std::sync::Arc;

/// Shared handler state: the store plus the collection every request targets.
pub struct ServerState {
    pub db: Arc<Roster>,
    pub collection: String,
}

#[derive(Deserialize)]
pub struct RequestParams {
    #[serde(rename = "requestType")]
    request_type: Option<String>,
    id: Option<String>,
    field: Option<String>,
    value: Option<String>,
    userdata: Option<String>,
}

impl RequestParams {
    fn field(&self) -> &str {
        self.field.as_deref().unwrap_or("")
    }
}

fn respond(result: Result<JsonValue>) -> HttpResponse {
    match result {
        Ok(data) => HttpResponse::Ok().json(ApiResponse::success(data)),
        Err(e) => HttpResponse::Ok().json(ApiResponse::error(e.to_string())),
    }
}

pub async fn handle_get(
    state: web::Data<ServerState>,
    params: web::Query<RequestParams>,
) -> impl Responder {
    let collection = state.collection.as_str();
    let request_type = params.request_type.as_deref().unwrap_or("");

    // Reads addressed by id reject a malformed id before touching the store.
    if matches!(request_type, "allData" | "basicData" | "specificData") {
        let id = params.id.as_deref().unwrap_or("");
        if id.len() != 8 {
            return HttpResponse::Ok().json(ApiResponse::error("Invalid ID provided"));
        }
    }
    let id = params.id.as_deref().unwrap_or("");

    match request_type {
        "allData" => respond(state.db.get_record(collection, id).map(|r| record_to_json(&r))),
        "basicData" => respond(
            state
                .db
                .get_record(collection, id)
                .map(|r| view_to_json(&projection::basic_view(&r))),
        ),
        "specificData" => respond(
            state
                .db
                .get_record(collection, id)
                .and_then(|r| projection::specific_view(&r, params.field()))
                .map(|p| projection_to_json(&p)),
        ),
        "usersByField" => {
            let value = parse_param_value(params.value.as_deref().unwrap_or(""));
            respond(
                state
                    .db
                    .find_by_field(collection, params.field(), &value)
                    .map(|records| {
                        JsonValue::Array(records.iter().map(record_to_json).collect())
                    }),
            )
        }
        "frequency" => respond(
            state
                .db
                .field_frequency(collection, params.field())
                .map(|report| frequency_to_json(&report)),
        ),
        other => HttpResponse::Ok().json(ApiResponse::error(format!(
            "Unknown request type {}",
            other
        ))),
    }
}

pub async fn handle_post(
    state: web::Data<ServerState>,
    params: web::Query<RequestParams>,
) -> impl Responder {
    let collection = state.collection.as_str();
    let id = params.id.as_deref().unwrap_or("");

    match params.request_type.as_deref().unwrap_or("") {
        "addUser" => {
            let raw = params.userdata.as_deref().unwrap_or("");
            let result = serde_json::from_str::<JsonValue>(raw)
                .map_err(|_| crate::error::RosterError::InvalidUserData)
                .and_then(json_to_insert_data)
                .and_then(|data| state.db.insert_record(collection, data));
            match result {
                // The assigned id is the only thing the client cannot know.
                Ok(id) => HttpResponse::Ok().json(ApiResponse::success(json!({ "id": id }))),
                Err(e) => HttpResponse::Ok().json(ApiResponse::error(e.to_string())),
            }
        }
        "editUser" => {
            let value = parse_param_value(params.value.as_deref().unwrap_or(""));
            match state
                .db
                .update_field(collection, id, params.field(), value)
            {
                Ok(()) => HttpResponse::Ok().json(ApiResponse::ok()),
                Err(e) => HttpResponse::Ok().json(ApiResponse::error(e.to_string())),
            }
        }
        "deleteUser" => match state.db.delete_record(collection, id) {
            Ok(()) => HttpResponse::Ok().json(ApiResponse::ok()),
            Err(e) => HttpResponse::Ok().json(ApiResponse::error(e.to_string())),
        },
        other => HttpResponse::Ok().json(ApiResponse::error(format!(
            "Unknown request type {}",
            other
        ))),
    }
}

async fn not_found(req: HttpRequest) -> impl Responder {
    let (path, method) = (req.path().to_string(), req.method().to_string());
    let msg = format!("404 Not Found: No route for {} {}", method, path);
    println!("{}", msg);
    HttpResponse::NotFound().json(ApiResponse::error(msg))
}

pub async fn run_http_server(
    db: Arc<Roster>,
    collection: &str,
    addr: &str,
) -> std::io::Result<()> {
    let state = web::Data::new(ServerState {
        db,
        collection: collection.to_string(),
    });
    println!("🚀 Starting HTTP server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .route("/", web::get().to(handle_get))
            .route("/", web::post().to(handle_post))
            .default_service(web::to(not_found))
    })
    .bind(addr)?
    .run()
    .await
}
