use std::sync::Arc;

use adapter::redis::RedisClient;
use adapter::repository::{
    activity_log::ActivityLogRepositoryImpl, auth::AuthRepositoryImpl,
    destination::DestinationRepositoryImpl, guide::GuideRepositoryImpl,
    health::HealthCheckRepositoryImpl, registration::RegistrationRepositoryImpl,
    trip::TripRepositoryImpl, user::UserRepositoryImpl,
};
use adapter::{database::ConnectionPool, token::TokenIssuer};
use kernel::repository::{
    activity_log::ActivityLogRepository, auth::AuthRepository,
    destination::DestinationRepository, guide::GuideRepository,
    health::HealthCheckRepository, registration::RegistrationRepository, trip::TripRepository,
    user::UserRepository,
};
use shared::config::AppConfig;

#[derive(Clone)]
pub struct AppRegistry {
    health_check_repository: Arc<dyn HealthCheckRepository>,
    auth_repository: Arc<dyn AuthRepository>,
    user_repository: Arc<dyn UserRepository>,
    destination_repository: Arc<dyn DestinationRepository>,
    guide_repository: Arc<dyn GuideRepository>,
    trip_repository: Arc<dyn TripRepository>,
    registration_repository: Arc<dyn RegistrationRepository>,
    activity_log_repository: Arc<dyn ActivityLogRepository>,
}

impl AppRegistry {
    pub fn new(
        pool: ConnectionPool,
        redis_client: Arc<RedisClient>,
        app_config: &AppConfig,
    ) -> Self {
        let health_check_repository = Arc::new(HealthCheckRepositoryImpl::new(pool.clone()));
        let auth_repository = Arc::new(AuthRepositoryImpl::new(
            pool.clone(),
            redis_client.clone(),
            TokenIssuer::new(&app_config.auth),
        ));
        let user_repository = Arc::new(UserRepositoryImpl::new(pool.clone()));
        let destination_repository = Arc::new(DestinationRepositoryImpl::new(pool.clone()));
        let guide_repository = Arc::new(GuideRepositoryImpl::new(pool.clone()));
        let trip_repository = Arc::new(TripRepositoryImpl::new(pool.clone()));
        let registration_repository = Arc::new(RegistrationRepositoryImpl::new(pool.clone()));
        let activity_log_repository = Arc::new(ActivityLogRepositoryImpl::new(pool.clone()));
        Self {
            health_check_repository,
            auth_repository,
            user_repository,
            destination_repository,
            guide_repository,
            trip_repository,
            registration_repository,
            activity_log_repository,
        }
    }

    pub fn health_check_repository(&self) -> Arc<dyn HealthCheckRepository> {
        self.health_check_repository.clone()
    }

    pub fn auth_repository(&self) -> Arc<dyn AuthRepository> {
        self.auth_repository.clone()
    }

    pub fn user_repository(&self) -> Arc<dyn UserRepository> {
        self.user_repository.clone()
    }

    pub fn destination_repository(&self) -> Arc<dyn DestinationRepository> {
        self.destination_repository.clone()
    }

    pub fn guide_repository(&self) -> Arc<dyn GuideRepository> {
        self.guide_repository.clone()
    }

    pub fn trip_repository(&self) -> Arc<dyn TripRepository> {
        self.trip_repository.clone()
    }

    pub fn registration_repository(&self) -> Arc<dyn RegistrationRepository> {
        self.registration_repository.clone()
    }

    pub fn activity_log_repository(&self) -> Arc<dyn ActivityLogRepository> {
        self.activity_log_repository.clone()
    }
}
