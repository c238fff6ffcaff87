//! Shopping lists: the user's current list, its items and list generation
//! from the pantry and from recipes.

use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::entities::{
    DEFAULT_LIST_NAME, InventoryItem, ItemStatus, NewShoppingList, NewShoppingListItem, Priority,
    RecipeIngredient, ShoppingList, ShoppingListItem, ShoppingListItemPatch, ShoppingListPatch,
};
use crate::domain::recommendation;
use crate::domain::repositories::{InventoryRepository, RecipeRepository, ShoppingListRepository};
use crate::error::AppError;

/// A list together with its items ordered by position.
#[derive(Debug, Clone)]
pub struct ListWithItems {
    pub list: ShoppingList,
    pub items: Vec<ShoppingListItem>,
}

fn list_not_found(id: i64) -> AppError {
    AppError::not_found("Lista de compras no encontrada", json!({ "id": id }))
}

fn item_not_found(id: i64) -> AppError {
    AppError::not_found("Artículo no encontrado", json!({ "id": id }))
}

fn normalized(name: &str) -> String {
    name.trim().to_lowercase()
}

impl NewShoppingListItem {
    fn restock(item: &InventoryItem) -> Self {
        Self {
            name: item.name.clone(),
            quantity: 1.0,
            unit: item.unit.clone(),
            category: Some(item.category.clone()),
            notes: None,
            priority: if item.is_finished {
                Priority::High
            } else {
                Priority::Medium
            },
            price: None,
            inventory_id: Some(item.id),
            recipe_id: None,
        }
    }

    fn for_recipe(ingredient: &RecipeIngredient) -> Self {
        Self {
            name: ingredient.name.clone(),
            quantity: ingredient.quantity,
            unit: ingredient.unit.clone(),
            category: None,
            notes: ingredient.notes.clone(),
            priority: Priority::Medium,
            price: None,
            inventory_id: ingredient.inventory_id,
            recipe_id: Some(ingredient.recipe_id),
        }
    }
}

pub struct ShoppingListService<S, I, R>
where
    S: ShoppingListRepository,
    I: InventoryRepository,
    R: RecipeRepository,
{
    lists: Arc<S>,
    inventory: Arc<I>,
    recipes: Arc<R>,
    low_stock_threshold: f64,
}

impl<S, I, R> ShoppingListService<S, I, R>
where
    S: ShoppingListRepository,
    I: InventoryRepository,
    R: RecipeRepository,
{
    pub fn new(lists: Arc<S>, inventory: Arc<I>, recipes: Arc<R>, low_stock_threshold: f64) -> Self {
        Self {
            lists,
            inventory,
            recipes,
            low_stock_threshold,
        }
    }

    /// The latest active list of the user, created on first use.
    pub async fn current_list(&self, user_id: i64) -> Result<ShoppingList, AppError> {
        if let Some(list) = self.lists.find_current(user_id).await? {
            return Ok(list);
        }

        let list = self
            .lists
            .create_list(
                user_id,
                NewShoppingList {
                    name: DEFAULT_LIST_NAME.to_string(),
                    ..Default::default()
                },
            )
            .await?;
        info!(list_id = list.id, user_id, "Created current shopping list");
        Ok(list)
    }

    pub async fn current(&self, user_id: i64) -> Result<ListWithItems, AppError> {
        let list = self.current_list(user_id).await?;
        let items = self.lists.list_items(list.id).await?;
        Ok(ListWithItems { list, items })
    }

    pub async fn all(&self, user_id: i64) -> Result<Vec<ShoppingList>, AppError> {
        self.lists.list_by_user(user_id).await
    }

    pub async fn create(&self, user_id: i64, new_list: NewShoppingList) -> Result<ShoppingList, AppError> {
        self.lists.create_list(user_id, new_list).await
    }

    pub async fn get(&self, user_id: i64, id: i64) -> Result<ListWithItems, AppError> {
        let list = self
            .lists
            .find_list(user_id, id)
            .await?
            .ok_or_else(|| list_not_found(id))?;
        let items = self.lists.list_items(list.id).await?;
        Ok(ListWithItems { list, items })
    }

    pub async fn update(
        &self,
        user_id: i64,
        id: i64,
        patch: ShoppingListPatch,
    ) -> Result<ShoppingList, AppError> {
        self.lists
            .update_list(user_id, id, patch)
            .await?
            .ok_or_else(|| list_not_found(id))
    }

    pub async fn delete(&self, user_id: i64, id: i64) -> Result<(), AppError> {
        if self.lists.delete_list(user_id, id).await? {
            Ok(())
        } else {
            Err(list_not_found(id))
        }
    }

    /// Items of the current list matching `status`.
    pub async fn items(&self, user_id: i64, status: ItemStatus) -> Result<Vec<ShoppingListItem>, AppError> {
        let list = self.current_list(user_id).await?;
        let items = self.lists.list_items(list.id).await?;
        Ok(items.into_iter().filter(|i| status.matches(i)).collect())
    }

    /// Adds an item to the current list. Linked inventory items and recipes
    /// must belong to the user.
    pub async fn add_item(
        &self,
        user_id: i64,
        new_item: NewShoppingListItem,
    ) -> Result<ShoppingListItem, AppError> {
        if let Some(id) = new_item.inventory_id
            && self.inventory.find_by_id(user_id, id).await?.is_none()
        {
            return Err(AppError::not_found(
                "Producto no encontrado",
                json!({ "inventoryItemId": id }),
            ));
        }
        if let Some(id) = new_item.recipe_id
            && self.recipes.find_by_id(user_id, id).await?.is_none()
        {
            return Err(AppError::not_found(
                "Receta no encontrada",
                json!({ "recipeId": id }),
            ));
        }

        let list = self.current_list(user_id).await?;
        self.lists
            .add_items(list.id, vec![new_item])
            .await?
            .pop()
            .ok_or_else(|| AppError::internal("No se pudo guardar el artículo", json!({})))
    }

    pub async fn update_item(
        &self,
        user_id: i64,
        item_id: i64,
        patch: ShoppingListItemPatch,
    ) -> Result<ShoppingListItem, AppError> {
        self.lists
            .update_item(user_id, item_id, patch)
            .await?
            .ok_or_else(|| item_not_found(item_id))
    }

    pub async fn set_purchased(
        &self,
        user_id: i64,
        item_id: i64,
        purchased: bool,
    ) -> Result<ShoppingListItem, AppError> {
        let patch = ShoppingListItemPatch {
            is_purchased: Some(purchased),
            ..Default::default()
        };
        self.update_item(user_id, item_id, patch).await
    }

    pub async fn delete_item(&self, user_id: i64, item_id: i64) -> Result<(), AppError> {
        if self.lists.delete_item(user_id, item_id).await? {
            Ok(())
        } else {
            Err(item_not_found(item_id))
        }
    }

    /// Removes items from the current list. Returns how many were removed.
    pub async fn clear(&self, user_id: i64, purchased_only: bool) -> Result<u64, AppError> {
        let list = self.current_list(user_id).await?;
        let removed = self.lists.clear_items(list.id, purchased_only).await?;
        debug!(list_id = list.id, removed, purchased_only, "Cleared shopping list items");
        Ok(removed)
    }

    /// Adds finished and low-stock pantry items to the current list.
    pub async fn generate_from_inventory(&self, user_id: i64) -> Result<Vec<ShoppingListItem>, AppError> {
        let inventory = self.inventory.list_by_user(user_id).await?;
        let candidates = inventory
            .iter()
            .filter(|item| item.needs_restock(self.low_stock_threshold))
            .map(NewShoppingListItem::restock)
            .collect();
        self.append_new(user_id, candidates).await
    }

    /// Adds the required ingredients of the given recipes that the pantry lacks.
    ///
    /// Recipes that do not exist for the user are skipped.
    pub async fn generate_from_recipes(
        &self,
        user_id: i64,
        recipe_ids: &[i64],
    ) -> Result<Vec<ShoppingListItem>, AppError> {
        let recipes = self.recipes.find_by_ids(user_id, recipe_ids).await?;
        let inventory = self.inventory.list_by_user(user_id).await?;
        let available = recommendation::available_names(&inventory);

        let candidates = recipes
            .iter()
            .flat_map(|recipe| recipe.required_ingredients())
            .filter(|ingredient| !available.contains(&normalized(&ingredient.name)))
            .map(NewShoppingListItem::for_recipe)
            .collect();
        self.append_new(user_id, candidates).await
    }

    /// Adds the chosen pantry items to the current list.
    pub async fn add_from_inventory(
        &self,
        user_id: i64,
        inventory_ids: &[i64],
    ) -> Result<Vec<ShoppingListItem>, AppError> {
        let items = self.inventory.find_by_ids(user_id, inventory_ids).await?;
        if items.is_empty() {
            return Err(AppError::not_found(
                "No se encontraron productos del inventario",
                json!({ "inventoryItemIds": inventory_ids }),
            ));
        }
        let candidates = items.iter().map(NewShoppingListItem::restock).collect();
        self.append_new(user_id, candidates).await
    }

    /// Appends `candidates` to the current list, skipping names already
    /// pending there and duplicates within the batch.
    async fn append_new(
        &self,
        user_id: i64,
        candidates: Vec<NewShoppingListItem>,
    ) -> Result<Vec<ShoppingListItem>, AppError> {
        let list = self.current_list(user_id).await?;
        let mut seen: HashSet<String> = self
            .lists
            .list_items(list.id)
            .await?
            .iter()
            .filter(|item| !item.is_purchased)
            .map(|item| normalized(&item.name))
            .collect();

        let fresh: Vec<NewShoppingListItem> = candidates
            .into_iter()
            .filter(|item| seen.insert(normalized(&item.name)))
            .collect();

        if fresh.is_empty() {
            return Ok(Vec::new());
        }

        let added = self.lists.add_items(list.id, fresh).await?;
        info!(list_id = list.id, user_id, added = added.len(), "Shopping list items generated");
        Ok(added)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::inventory_item::sample_item;
    use crate::domain::entities::recipe::sample_recipe;
    use crate::domain::entities::shopping_list::{sample_list, sample_list_item};
    use crate::domain::repositories::{
        MockInventoryRepository, MockRecipeRepository, MockShoppingListRepository,
    };

    type Service =
        ShoppingListService<MockShoppingListRepository, MockInventoryRepository, MockRecipeRepository>;

    fn service(
        lists: MockShoppingListRepository,
        inventory: MockInventoryRepository,
        recipes: MockRecipeRepository,
    ) -> Service {
        ShoppingListService::new(Arc::new(lists), Arc::new(inventory), Arc::new(recipes), 1.0)
    }

    /// Current list 7 holding a pending "Leche" and a purchased "Pan".
    fn lists_with_current() -> MockShoppingListRepository {
        let mut lists = MockShoppingListRepository::new();
        lists
            .expect_find_current()
            .returning(|user_id| Ok(Some(sample_list(7, user_id))));
        lists.expect_list_items().returning(|list_id| {
            Ok(vec![
                sample_list_item(1, list_id, "Leche", false),
                sample_list_item(2, list_id, "Pan", true),
            ])
        });
        lists
    }

    fn echo_added(list_id: i64, items: Vec<NewShoppingListItem>) -> Vec<ShoppingListItem> {
        items
            .into_iter()
            .enumerate()
            .map(|(i, new_item)| {
                let mut item = sample_list_item(100 + i as i64, list_id, &new_item.name, false);
                item.inventory_id = new_item.inventory_id;
                item.recipe_id = new_item.recipe_id;
                item.priority = new_item.priority;
                item
            })
            .collect()
    }

    #[tokio::test]
    async fn test_current_list_is_created_on_demand() {
        let mut lists = MockShoppingListRepository::new();
        lists.expect_find_current().returning(|_| Ok(None));
        lists
            .expect_create_list()
            .withf(|_, new_list| new_list.name == DEFAULT_LIST_NAME)
            .times(1)
            .returning(|user_id, _| Ok(sample_list(3, user_id)));

        let list = service(lists, MockInventoryRepository::new(), MockRecipeRepository::new())
            .current_list(5)
            .await
            .unwrap();
        assert_eq!(list.id, 3);
        assert_eq!(list.user_id, 5);
    }

    #[tokio::test]
    async fn test_items_filter_by_status() {
        let svc = service(
            lists_with_current(),
            MockInventoryRepository::new(),
            MockRecipeRepository::new(),
        );

        let pending = svc.items(1, ItemStatus::Pending).await.unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].name, "Leche");

        let purchased = svc.items(1, ItemStatus::Purchased).await.unwrap();
        assert_eq!(purchased[0].name, "Pan");

        assert_eq!(svc.items(1, ItemStatus::All).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_generate_from_inventory_skips_pending_names() {
        let mut lists = lists_with_current();
        lists
            .expect_add_items()
            .withf(|list_id, items| {
                let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
                *list_id == 7 && names == vec!["Huevos", "Pan"]
            })
            .times(1)
            .returning(|list_id, items| Ok(echo_added(list_id, items)));

        let mut inventory = MockInventoryRepository::new();
        inventory.expect_list_by_user().returning(|_| {
            let mut leche = sample_item(1, "leche", "Lácteos", "nevera");
            leche.quantity = 0.5;
            let mut huevos = sample_item(2, "Huevos", "Huevos", "nevera");
            huevos.is_finished = true;
            huevos.quantity = 6.0;
            let mut arroz = sample_item(3, "Arroz", "Cereales", "despensa");
            arroz.quantity = 3.0;
            // purchased items do not block a new entry
            let pan = sample_item(4, "Pan", "Panadería", "despensa");
            Ok(vec![leche, huevos, arroz, pan])
        });

        let added = service(lists, inventory, MockRecipeRepository::new())
            .generate_from_inventory(1)
            .await
            .unwrap();

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].inventory_id, Some(2));
        assert_eq!(added[0].priority, Priority::High);
    }

    #[tokio::test]
    async fn test_generate_from_recipes_adds_missing_required_ingredients() {
        let mut lists = lists_with_current();
        lists
            .expect_add_items()
            .withf(|_, items| {
                let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
                names == vec!["patata", "cebolla"]
            })
            .times(1)
            .returning(|list_id, items| Ok(echo_added(list_id, items)));

        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_ids()
            .withf(|_, ids| ids == [1, 2])
            .returning(|_, _| {
                Ok(vec![
                    sample_recipe(
                        1,
                        "Tortilla",
                        &[("huevo", false), ("patata", false), ("perejil", true)],
                    ),
                    sample_recipe(2, "Sopa", &[("Patata", false), ("cebolla", false), ("leche", false)]),
                ])
            });

        let mut inventory = MockInventoryRepository::new();
        inventory
            .expect_list_by_user()
            .returning(|_| Ok(vec![sample_item(1, "Huevo", "Huevos", "nevera")]));

        let added = service(lists, inventory, recipes)
            .generate_from_recipes(1, &[1, 2])
            .await
            .unwrap();

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].recipe_id, Some(1));
        assert_eq!(added[1].recipe_id, Some(2));
    }

    #[tokio::test]
    async fn test_generation_with_nothing_new_writes_nothing() {
        let mut lists = lists_with_current();
        lists.expect_add_items().never();

        let mut inventory = MockInventoryRepository::new();
        inventory.expect_list_by_user().returning(|_| {
            let mut leche = sample_item(1, "Leche", "Lácteos", "nevera");
            leche.is_finished = true;
            Ok(vec![leche])
        });

        let added = service(lists, inventory, MockRecipeRepository::new())
            .generate_from_inventory(1)
            .await
            .unwrap();
        assert!(added.is_empty());
    }

    #[tokio::test]
    async fn test_add_from_inventory_with_unknown_ids_is_not_found() {
        let mut inventory = MockInventoryRepository::new();
        inventory.expect_find_by_ids().returning(|_, _| Ok(Vec::new()));

        let err = service(
            MockShoppingListRepository::new(),
            inventory,
            MockRecipeRepository::new(),
        )
        .add_from_inventory(1, &[42])
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    fn manual_item(inventory_id: Option<i64>, recipe_id: Option<i64>) -> NewShoppingListItem {
        NewShoppingListItem {
            name: "Huevos".to_string(),
            quantity: 1.0,
            unit: "docena".to_string(),
            category: None,
            notes: None,
            priority: Priority::Medium,
            price: None,
            inventory_id,
            recipe_id,
        }
    }

    #[tokio::test]
    async fn test_add_item_rejects_foreign_links() {
        let mut lists = MockShoppingListRepository::new();
        lists.expect_add_items().never();
        let mut inventory = MockInventoryRepository::new();
        inventory
            .expect_find_by_id()
            .withf(|user_id, id| *user_id == 1 && *id == 40)
            .returning(|_, _| Ok(None));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_find_by_id()
            .withf(|user_id, id| *user_id == 1 && *id == 50)
            .returning(|_, _| Ok(None));
        let svc = service(lists, inventory, recipes);

        let err = svc.add_item(1, manual_item(Some(40), None)).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
        let err = svc.add_item(1, manual_item(None, Some(50))).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_item_with_owned_link() {
        let mut lists = lists_with_current();
        lists
            .expect_add_items()
            .times(1)
            .returning(|list_id, items| Ok(echo_added(list_id, items)));
        let mut inventory = MockInventoryRepository::new();
        inventory
            .expect_find_by_id()
            .returning(|_, id| Ok(Some(sample_item(id, "Huevos", "Huevos", "nevera"))));

        let item = service(lists, inventory, MockRecipeRepository::new())
            .add_item(1, manual_item(Some(3), None))
            .await
            .unwrap();

        assert_eq!(item.inventory_id, Some(3));
        assert_eq!(item.shopping_list_id, 7);
    }

    #[tokio::test]
    async fn test_set_purchased_and_missing_item() {
        let mut lists = MockShoppingListRepository::new();
        lists
            .expect_update_item()
            .withf(|_, item_id, patch| *item_id == 1 && patch.is_purchased == Some(true))
            .returning(|_, item_id, patch| {
                let mut item = sample_list_item(item_id, 7, "Leche", false);
                patch.apply_to(&mut item);
                Ok(Some(item))
            });
        lists
            .expect_update_item()
            .withf(|_, item_id, _| *item_id != 1)
            .returning(|_, _, _| Ok(None));
        let svc = service(lists, MockInventoryRepository::new(), MockRecipeRepository::new());

        assert!(svc.set_purchased(1, 1, true).await.unwrap().is_purchased);
        assert!(matches!(
            svc.set_purchased(1, 2, true).await.unwrap_err(),
            AppError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn test_clear_purchased_uses_current_list() {
        let mut lists = MockShoppingListRepository::new();
        lists
            .expect_find_current()
            .returning(|user_id| Ok(Some(sample_list(7, user_id))));
        lists
            .expect_clear_items()
            .withf(|list_id, purchased_only| *list_id == 7 && *purchased_only)
            .times(1)
            .returning(|_, _| Ok(3));

        let removed = service(lists, MockInventoryRepository::new(), MockRecipeRepository::new())
            .clear(1, true)
            .await
            .unwrap();
        assert_eq!(removed, 3);
    }
}
