use crate::domain::category::Category;
use crate::repository::CategoryReader;

use super::{ServiceError, ServiceResult};

/// List every category as `{id, name}`.
pub fn list_categories<R>(repo: &R) -> ServiceResult<Vec<Category>>
where
    R: CategoryReader,
{
    match repo.list_categories() {
        Ok(categories) => Ok(categories),
        Err(e) => Err(ServiceError::internal(
            e.kind(),
            format!("Failed to list categories: {e}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{CategoryId, CategoryName};
    use crate::repository::test::TestRepository;

    fn category(id: i32, name: &str) -> Category {
        Category {
            id: CategoryId::new(id).unwrap(),
            name: CategoryName::new(name).unwrap(),
        }
    }

    #[test]
    fn returns_categories_sorted_by_name() {
        let repo = TestRepository::new(vec![category(1, "Tools"), category(2, "Garden")], vec![]);

        let result = list_categories(&repo).unwrap();

        assert_eq!(result, vec![category(2, "Garden"), category(1, "Tools")]);
        let value = serde_json::to_value(&result[0]).unwrap();
        assert_eq!(value, serde_json::json!({ "id": 2, "name": "Garden" }));
    }
}
