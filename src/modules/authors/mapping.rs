//! Field correspondence between the author entity and its DTOs.

use super::models::{Author, AuthorCreate, AuthorReadOnly, AuthorUpdate, NewAuthor};

impl From<Author> for AuthorReadOnly {
    fn from(author: Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name,
            last_name: author.last_name,
            bio: author.bio,
        }
    }
}

impl From<AuthorCreate> for NewAuthor {
    fn from(dto: AuthorCreate) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            bio: dto.bio,
        }
    }
}

impl AuthorUpdate {
    /// Overwrite the entity fields this DTO carries. Identity and the
    /// concurrency token are left alone.
    pub fn apply_to(self, author: &mut Author) {
        author.first_name = self.first_name;
        author.last_name = self.last_name;
        author.bio = self.bio;
    }
}
