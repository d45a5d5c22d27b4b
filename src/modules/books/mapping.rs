//! Field correspondence between the book entity and its write DTOs.
//!
//! Read shapes (`BookReadOnly`, `BookDetails`) are projections and come
//! straight out of the repository queries.

use super::models::{Book, BookCreate, BookUpdate, NewBook};

impl From<BookCreate> for NewBook {
    fn from(dto: BookCreate) -> Self {
        Self {
            title: dto.title,
            year: dto.year,
            isbn: dto.isbn,
            summary: dto.summary,
            image: dto.image,
            price: dto.price,
            author_id: dto.author_id,
        }
    }
}

impl BookUpdate {
    /// Overwrite the entity fields this DTO carries. Identity and the
    /// concurrency token are left alone.
    pub fn apply_to(self, book: &mut Book) {
        book.title = self.title;
        book.year = self.year;
        book.isbn = self.isbn;
        book.summary = self.summary;
        book.image = self.image;
        book.price = self.price;
        book.author_id = self.author_id;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_replaces_mutable_fields_only() {
        let mut book = Book {
            id: 5,
            title: "Persuasion".to_string(),
            year: 1817,
            isbn: "111".to_string(),
            summary: "Second chances at love.".to_string(),
            image: Some("persuasion.png".to_string()),
            price: 7.5,
            author_id: 1,
            version: 2,
        };

        BookUpdate {
            id: 5,
            title: "Persuasion (Annotated)".to_string(),
            year: 2012,
            isbn: "222".to_string(),
            summary: "Second chances at love, annotated.".to_string(),
            image: None,
            price: 12.0,
            author_id: 3,
        }
        .apply_to(&mut book);

        assert_eq!(book.id, 5);
        assert_eq!(book.version, 2);
        assert_eq!(book.title, "Persuasion (Annotated)");
        assert_eq!(book.image, None);
        assert_eq!(book.author_id, 3);
    }
}
