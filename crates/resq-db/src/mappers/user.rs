//! User model -> profile

use resq_core::entities::UserProfile;

use crate::models::UserModel;

impl From<UserModel> for UserProfile {
    fn from(model: UserModel) -> Self {
        UserProfile {
            email: model.email,
            phone_number: model.phone_number,
            photo_url: model.photo_url,
            bio: model.bio,
            country_code: model.country_code,
            created_at: model.created_at,
            last_login_at: model.last_login_at,
            auth_provider: model.auth_provider,
            ..UserProfile::new(model.id, model.name)
        }
    }
}
