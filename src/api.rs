use actix_web::{get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::Deserialize;

use crate::publisher::CoverPublisher;
use crate::s3_querier::S3Querier;

#[derive(Debug, Deserialize)]
pub struct PublishRequest {
    pub video_id: String,
    pub source_url: String,
}

/// Fetch a cover image and publish it for a video
///
/// # Example
/// ```shell
/// curl -X POST http://localhost:8080/covers \
///      -H 'content-type: application/json' \
///      -d '{"video_id": "55123", "source_url": "https://example.com/poster.jpg"}'
/// ```
///
/// # Returns
/// ```json
/// {
///    "video_id": "55123",
///    "key": "video/cover/0715cb7c0c21cfcaf1267d99465dd491.jpg",
///    "url": "https://static.656932.com/video/cover/0715cb7c0c21cfcaf1267d99465dd491.jpg"
/// }
/// ```
#[post("/covers")]
pub async fn publish_cover(
    publisher: web::Data<CoverPublisher>,
    body: web::Json<PublishRequest>,
) -> impl Responder {
    match publisher.publish(&body.video_id, &body.source_url).await {
        Ok(location) => HttpResponse::Ok().json(location),
        Err(err) => HttpResponse::InternalServerError().body(format!("{:#}", err)),
    }
}

/// Get where a video's cover lives, without uploading anything
///
/// # Example
/// ```shell
/// curl http://localhost:8080/covers/55123
/// ```
#[get("/covers/{video_id}")]
pub async fn get_cover(publisher: web::Data<CoverPublisher>, path: web::Path<String>) -> impl Responder {
    match publisher.locate(&path) {
        Ok(location) => HttpResponse::Ok().json(location),
        Err(err) => HttpResponse::InternalServerError().body(format!("{:#}", err)),
    }
}

/// List all covers in the destination bucket
///
/// # Example
/// ```shell
/// curl http://localhost:8080/covers
/// ```
///
/// # Returns
/// ```json
///[{
///    "key": "video/cover/0715cb7c0c21cfcaf1267d99465dd491.jpg",
///    "url": "https://static.656932.com/video/cover/0715cb7c0c21cfcaf1267d99465dd491.jpg",
///    "size": 2048
///}]
/// ```
#[get("/covers")]
pub async fn list_covers(
    publisher: web::Data<CoverPublisher>,
    querier: web::Data<S3Querier>,
) -> impl Responder {
    match querier.list_covers(&publisher.config().destination_bucket).await {
        Ok(covers) => HttpResponse::Ok().json(covers),
        Err(err) => HttpResponse::InternalServerError().body(format!("{:#}", err)),
    }
}

/// Run the API server
pub async fn run_api_server(publisher: CoverPublisher, querier: S3Querier, port: u16) -> std::io::Result<()> {
    let publisher = web::Data::new(publisher);
    let querier = web::Data::new(querier);

    HttpServer::new(move || {
        App::new()
            .app_data(publisher.clone())
            .app_data(querier.clone())
            .service(publish_cover)
            .service(list_covers)
            .service(get_cover)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await
}
