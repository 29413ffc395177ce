use common::{NewUser, User, UserId};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreateUserError {
    #[error("name and email are required")]
    MissingField,

    #[error("email already exists: {0}")]
    DuplicateEmail(String),
}

/// Users held in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct UserStore {
    users: Vec<User>,
    next_id: UserId,
}

impl UserStore {
    pub fn seeded() -> Self {
        let mut store = Self::default();
        for (name, email) in [
            ("Alice Johnson", "alice@example.com"),
            ("Bob Smith", "bob@example.com"),
            ("Charlie Brown", "charlie@example.com"),
        ] {
            let _ = store.create(NewUser {
                name: name.to_string(),
                email: email.to_string(),
            });
        }
        store
    }

    pub fn list(&self) -> &[User] {
        &self.users
    }

    pub fn get(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn create(&mut self, request: NewUser) -> Result<User, CreateUserError> {
        let name = request.name.trim();
        let email = request.email.trim();
        if name.is_empty() || email.is_empty() {
            return Err(CreateUserError::MissingField);
        }

        if self.users.iter().any(|user| user.email == email) {
            return Err(CreateUserError::DuplicateEmail(email.to_string()));
        }

        self.next_id += 1;
        let user = User {
            id: self.next_id,
            name: name.to_string(),
            email: email.to_string(),
        };
        self.users.push(user.clone());
        Ok(user)
    }
}
