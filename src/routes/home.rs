use actix_web::HttpResponse;

use super::helpers::see_other;

pub async fn home() -> HttpResponse {
    see_other("/mailinglist/")
}
