pub mod health;
pub mod likes;
pub mod users;
pub mod videos;

use crate::application::assets::AssetManager;
use crate::application::auth::TokenService;
use crate::infrastructure::state::AppState;

pub(crate) fn token_service(state: &AppState) -> TokenService {
    TokenService::new(
        state.users.clone(),
        state.auth_service.clone(),
        state.password_service.clone(),
    )
}

pub(crate) fn asset_manager(state: &AppState) -> AssetManager {
    AssetManager::new(state.object_store.clone())
}
