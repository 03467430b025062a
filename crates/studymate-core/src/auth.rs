use studymate_shared::{
  AuthResponse,
  LoginRequest,
  RegisterRequest
};

use crate::api::{
  ApiClient,
  Transport
};
use crate::error::{
  AuthError,
  ValidationError
};
use crate::notify::NoticeLevel;
use crate::session::SessionStatus;

pub const WELCOME_MESSAGE: &str =
  "¡Bienvenido a StudyMate IA!";

#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
)]
pub enum AuthMode {
  #[default]
  Login,
  Register
}

impl AuthMode {
  pub fn toggled(self) -> Self {
    match self {
      | AuthMode::Login => AuthMode::Register,
      | AuthMode::Register => AuthMode::Login
    }
  }

  pub fn title(self) -> &'static str {
    match self {
      | AuthMode::Login => "Iniciar Sesión",
      | AuthMode::Register => "Registrarse"
    }
  }

  pub fn submit_label(self) -> &'static str {
    match self {
      | AuthMode::Login => "Iniciar Sesión",
      | AuthMode::Register => "Registrarse"
    }
  }

  pub fn switch_prompt(
    self
  ) -> &'static str {
    match self {
      | AuthMode::Login => {
        "¿No tienes cuenta? Regístrate"
      }
      | AuthMode::Register => {
        "¿Ya tienes cuenta? Inicia sesión"
      }
    }
  }

  /// Nombre, apellido and the password
  /// confirmation only show when
  /// registering.
  pub fn shows_profile_fields(
    self
  ) -> bool {
    self == AuthMode::Register
  }
}

#[derive(
  Debug, Clone, Default, PartialEq, Eq,
)]
pub struct AuthForm {
  pub name:      String,
  pub last_name: String,
  pub email:     String,
  pub password:  String,
  pub confirm:   String
}

impl AuthForm {
  fn require_credentials(
    &self
  ) -> Result<(), AuthError> {
    if self.email.trim().is_empty() {
      return Err(AuthError::Invalid(
        ValidationError::required(
          "email",
          "El email es obligatorio"
        )
      ));
    }
    if self.password.is_empty() {
      return Err(AuthError::Invalid(
        ValidationError::required(
          "password",
          "La contraseña es obligatoria"
        )
      ));
    }
    Ok(())
  }

  pub fn login_request(
    &self
  ) -> Result<LoginRequest, AuthError> {
    self.require_credentials()?;
    Ok(LoginRequest {
      email:    self.email.trim().to_string(),
      password: self.password.clone()
    })
  }

  /// The confirmation check runs first so
  /// a mismatch never reaches the network.
  pub fn register_request(
    &self
  ) -> Result<RegisterRequest, AuthError> {
    if self.password != self.confirm {
      return Err(AuthError::PasswordMismatch);
    }
    self.require_credentials()?;
    if self.name.trim().is_empty() {
      return Err(AuthError::Invalid(
        ValidationError::required(
          "nombre",
          "El nombre es obligatorio"
        )
      ));
    }
    Ok(RegisterRequest {
      name:      self.name.trim().to_string(),
      last_name: self
        .last_name
        .trim()
        .to_string(),
      email:     self.email.trim().to_string(),
      password:  self.password.clone()
    })
  }
}

pub async fn login<T: Transport>(
  client: &ApiClient<T>,
  form: &AuthForm
) -> Result<AuthResponse, AuthError> {
  let request = form.login_request()?;
  let response =
    client.login(&request).await?;
  tracing::info!(
    user_id = response.user.id,
    "login accepted"
  );
  Ok(response)
}

pub async fn register<T: Transport>(
  client: &ApiClient<T>,
  form: &AuthForm
) -> Result<AuthResponse, AuthError> {
  let request = form.register_request()?;
  let response =
    client.register(&request).await?;
  tracing::info!(
    user_id = response.user.id,
    "registration accepted"
  );
  Ok(response)
}

pub async fn submit<T: Transport>(
  client: &ApiClient<T>,
  mode: AuthMode,
  form: &AuthForm
) -> Result<AuthResponse, AuthError> {
  match mode {
    | AuthMode::Login => {
      login(client, form).await
    }
    | AuthMode::Register => {
      register(client, form).await
    }
  }
}

/// Checks the client's token with a
/// single `/auth/me` call. Any failure
/// invalidates the session.
pub async fn validate_session<
  T: Transport
>(
  client: &ApiClient<T>
) -> SessionStatus {
  if client.token().is_none() {
    return SessionStatus::Missing;
  }

  match client.me().await {
    | Ok(user) => SessionStatus::Valid(user),
    | Err(err) => {
      tracing::warn!(
        error = %err,
        "session validation failed"
      );
      SessionStatus::Invalid
    }
  }
}

#[derive(
  Debug, Clone, Copy, PartialEq, Eq,
)]
pub enum LogoutReason {
  User,
  Idle
}

impl LogoutReason {
  pub fn message(self) -> &'static str {
    match self {
      | LogoutReason::User => "Sesión cerrada",
      | LogoutReason::Idle => {
        "Sesión cerrada por inactividad"
      }
    }
  }

  pub fn level(self) -> NoticeLevel {
    match self {
      | LogoutReason::User => NoticeLevel::Info,
      | LogoutReason::Idle => {
        NoticeLevel::Warning
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mode_toggles_and_labels() {
    let mode = AuthMode::default();
    assert!(!mode.shows_profile_fields());
    assert_eq!(
      mode.toggled(),
      AuthMode::Register
    );
    assert!(
      mode
        .toggled()
        .shows_profile_fields()
    );
    assert_eq!(
      mode.toggled().toggled(),
      AuthMode::Login
    );
  }

  #[test]
  fn password_mismatch_wins_over_other_checks()
  {
    let form = AuthForm {
      password: "abc".to_string(),
      confirm: "abd".to_string(),
      ..AuthForm::default()
    };
    assert_eq!(
      form
        .register_request()
        .expect_err("mismatch"),
      AuthError::PasswordMismatch
    );
  }

  #[test]
  fn register_request_trims_fields() {
    let form = AuthForm {
      name:      " Ana ".to_string(),
      last_name: "Ruiz".to_string(),
      email:     " ana@example.com"
        .to_string(),
      password:  "s3cret".to_string(),
      confirm:   "s3cret".to_string()
    };
    let request = form
      .register_request()
      .expect("valid registration");
    assert_eq!(request.name, "Ana");
    assert_eq!(
      request.email,
      "ana@example.com"
    );
  }

  #[test]
  fn logout_reasons_pick_notice() {
    assert_eq!(
      LogoutReason::Idle.level(),
      NoticeLevel::Warning
    );
    assert_eq!(
      LogoutReason::User.message(),
      "Sesión cerrada"
    );
  }
}
