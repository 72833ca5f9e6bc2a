use std::sync::Arc;

use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::categories::repositories::CategoryRepository;

/// Service for category operations
pub struct CategoryService {
    repository: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(repository: Arc<dyn CategoryRepository>) -> Self {
        Self { repository }
    }

    /// List all categories
    pub async fn list(&self) -> Result<Vec<CategoryResponseDto>> {
        let categories = self.repository.list().await?;
        Ok(categories.into_iter().map(|c| c.into()).collect())
    }

    /// Get category by id
    pub async fn get(&self, id: Uuid) -> Result<CategoryResponseDto> {
        self.repository
            .find_by_id(id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::InMemoryStore;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_list_and_get() {
        let store = InMemoryStore::new();
        let shoes = store.add_category("Shoes").await;
        store.add_category("Bags").await;

        let service = CategoryService::new(Arc::new(store.clone()));

        let all = assert_ok!(service.list().await);
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Bags", "Shoes"]);

        let found = assert_ok!(service.get(shoes.id).await);
        assert_eq!(found.name, "Shoes");
    }

    #[tokio::test]
    async fn test_get_unknown_is_not_found() {
        let service = CategoryService::new(Arc::new(InMemoryStore::new()));
        let result = service.get(Uuid::new_v4()).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
