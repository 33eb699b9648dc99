//! Identity model -> entity (the hash stays in the database layer)

use resq_core::entities::Identity;

use crate::models::IdentityModel;

impl From<IdentityModel> for Identity {
    fn from(model: IdentityModel) -> Self {
        Identity {
            uid: model.uid,
            email: model.email,
            display_name: model.display_name,
        }
    }
}
