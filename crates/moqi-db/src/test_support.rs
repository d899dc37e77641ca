//! Shared test utilities for moqi-db tests.

use moqi_core::entities::{Startup, Swiper};

use crate::MoqiDb;
use crate::repos::startup::NewStartup;
use crate::repos::swiper::NewSwiper;
use crate::service::MoqiService;

/// Create an in-memory `MoqiService`.
pub async fn test_service() -> MoqiService {
    let db = MoqiDb::open_local(":memory:").await.unwrap();
    MoqiService::from_db(db)
}

/// Insert one startup per name, in order.
pub async fn seed_startups(svc: &MoqiService, names: &[&str]) -> Vec<Startup> {
    let mut startups = Vec::with_capacity(names.len());
    for name in names {
        startups.push(svc.create_startup(&NewStartup::named(*name)).await.unwrap());
    }
    startups
}

/// Insert a swiper named `name`.
pub async fn seed_swiper(svc: &MoqiService, name: &str) -> Swiper {
    svc.create_swiper(&NewSwiper::named(name)).await.unwrap()
}
