// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::context::WorkflowContext;
use crate::section::{Notice, Outcome};
use qwikride_api::{ApiError, Transport};
use qwikride_domain::{LoginRequest, RegisterRequest, SessionUser};
use tracing::{info, warn};

const INVALID_CREDENTIALS: &str = "Invalid username or password";
const UNREACHABLE: &str = "Failed to connect to server. Please ensure the backend is running.";
const REGISTERED: &str = "Account created successfully. Please sign in.";
const REGISTER_FAILED: &str = "Registration failed. Please try again.";

/// Sign-in, sign-up and sign-out.
#[derive(Debug)]
pub struct AuthWorkflow<T> {
    ctx: WorkflowContext<T>,
    notice: Option<Notice>,
}

impl<T: Transport> AuthWorkflow<T> {
    #[must_use]
    pub const fn new(ctx: WorkflowContext<T>) -> Self {
        Self { ctx, notice: None }
    }

    /// Feedback from the last action.
    #[must_use]
    pub const fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Signs in and stores the session.
    ///
    /// Any rejection of the credentials is reported the same way so the
    /// response does not reveal which field was wrong.
    pub async fn login(&mut self, username: &str, password: &str) -> Outcome {
        let request: LoginRequest = match LoginRequest::new(username, password) {
            Ok(request) => request,
            Err(e) => return self.reject(e.to_string()),
        };

        let response = match self.ctx.api().login(&request).await {
            Ok(response) => response.data,
            Err(e) => {
                warn!(username = %request.username, error = %e, "Login failed");
                let message: &str = match e {
                    ApiError::Unreachable { .. } => UNREACHABLE,
                    _ => INVALID_CREDENTIALS,
                };
                return self.fail(String::from(message));
            }
        };

        let (token, user): (String, SessionUser) = response.into_session();
        let user_id: i64 = user.id;
        if let Err(e) = self.ctx.session().login(token, user) {
            warn!(user_id, error = %e, "Failed to store session");
            return self.fail(e.to_string());
        }
        info!(user_id, username = %request.username, "Signed in");
        self.notice = None;
        Outcome::Completed
    }

    /// Creates an account. The new user still has to sign in.
    pub async fn register(&mut self, request: &RegisterRequest) -> Outcome {
        let request: RegisterRequest = match request.validated() {
            Ok(request) => request,
            Err(e) => return self.reject(e.to_string()),
        };

        match self.ctx.api().register(&request).await {
            Ok(response) => {
                info!(user_id = response.data.id, username = %response.data.username, "Account created");
                self.notice = Some(Notice::Success(String::from(REGISTERED)));
                Outcome::Completed
            }
            Err(e) => {
                warn!(username = %request.username, error = %e, "Registration failed");
                self.fail(e.message_or(REGISTER_FAILED))
            }
        }
    }

    /// Signs out. Memory is cleared even if storage cannot be.
    pub fn logout(&mut self) -> Outcome {
        self.notice = None;
        match self.ctx.session().logout() {
            Ok(()) => Outcome::Completed,
            Err(e) => {
                warn!(error = %e, "Failed to clear stored session");
                Outcome::Failed(e.to_string())
            }
        }
    }

    fn reject(&mut self, message: String) -> Outcome {
        self.notice = Some(Notice::Error(message.clone()));
        Outcome::Rejected(message)
    }

    fn fail(&mut self, message: String) -> Outcome {
        self.notice = Some(Notice::Error(message.clone()));
        Outcome::Failed(message)
    }
}
