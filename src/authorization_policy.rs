use axum_session_middleware::AxumSession;
use uuid::Uuid;

use crate::{error::AppError, login_managers};

/// The signed-in barber.
#[derive(Debug, Clone)]
pub struct Staff {
    pub barber_id: Uuid,
    pub barber_name: String,
}

/// Any signed-in barber may read shop-wide data.
pub fn require_staff(session: &AxumSession) -> Result<Staff, AppError> {
    let session_data = session.require_login()?;
    Ok(Staff {
        barber_id: session_data.user_id,
        barber_name: session
            .get_data(login_managers::BARBER_NAME)
            .unwrap_or_default()
            .to_owned(),
    })
}

/// Appointments and breaks may only be changed by the barber they belong to.
pub fn require_same_barber(staff: &Staff, owner: Uuid) -> Result<(), AppError> {
    if staff.barber_id == owner {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You can only manage your own appointments and breaks".into(),
        ))
    }
}
