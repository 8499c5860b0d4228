//! SeaORM-backed controller

use crate::actions::EntityAction;
use crate::filters::EntityFilter;
use adminkit::display::humanize;
use adminkit::{AdminError, AdminResult, Controller, FilterSpec, ItemPage, ListQuery};
use async_trait::async_trait;
use indexmap::IndexMap;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, DatabaseConnection, EntityTrait, IdenStatic,
    IntoActiveModel, Iterable, Order, PaginatorTrait, PrimaryKeyToColumn, PrimaryKeyTrait,
    QueryOrder,
};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Display;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::Arc;

struct RegisteredFilter<E: EntityTrait> {
    label: String,
    filter: Box<dyn EntityFilter<E>>,
}

/// [`Controller`] implementation over a SeaORM entity.
///
/// `E` is the entity, `A` its active model. The entity must have a single
/// primary-key column whose value type parses from a string; that covers
/// integer, uuid, and string keys.
pub struct SeaOrmController<E, A>
where
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E>,
{
    db: Arc<DatabaseConnection>,
    resource: String,
    pk_field: String,
    per_page: u64,
    // column name + direction; resolved via `Column::from_str` per query
    default_order: Option<(String, Order)>,
    filters: IndexMap<String, RegisteredFilter<E>>,
    actions: IndexMap<String, Box<dyn EntityAction<E>>>,
    _active_model: PhantomData<fn() -> A>,
}

impl<E, A> SeaOrmController<E, A>
where
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E>,
{
    /// New controller for an entity, named for error messages.
    pub fn new(db: Arc<DatabaseConnection>, resource: impl Into<String>) -> Self {
        let pk_field = E::PrimaryKey::iter()
            .next()
            .map(|key| key.into_column().as_str().to_string())
            .unwrap_or_else(|| "id".to_string());
        Self {
            db,
            resource: resource.into(),
            pk_field,
            per_page: adminkit::controller::DEFAULT_PER_PAGE,
            default_order: None,
            filters: IndexMap::new(),
            actions: IndexMap::new(),
            _active_model: PhantomData,
        }
    }

    /// Default page size.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u64) -> Self {
        self.per_page = per_page.max(1);
        self
    }

    /// Ordering applied when the query does not name a column.
    #[must_use]
    pub fn with_default_order(mut self, column: E::Column, order: Order) -> Self {
        self.default_order = Some((column.as_str().to_string(), order));
        self
    }

    /// Register a filter under a query-string key.
    #[must_use]
    pub fn filter(mut self, key: impl Into<String>, filter: impl EntityFilter<E> + 'static) -> Self {
        let key = key.into();
        let label = humanize(&key);
        self.filters.insert(
            key,
            RegisteredFilter {
                label,
                filter: Box::new(filter),
            },
        );
        self
    }

    /// Register a bulk action.
    #[must_use]
    pub fn action(mut self, name: impl Into<String>, action: impl EntityAction<E> + 'static) -> Self {
        self.actions.insert(name.into(), Box::new(action));
        self
    }
}

impl<E, A> SeaOrmController<E, A>
where
    E: EntityTrait,
    A: ActiveModelTrait<Entity = E>,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: FromStr,
    <<E::PrimaryKey as PrimaryKeyTrait>::ValueType as FromStr>::Err: Display,
{
    fn parse_pk(&self, pk: &str) -> AdminResult<<E::PrimaryKey as PrimaryKeyTrait>::ValueType> {
        pk.parse().map_err(
            |e: <<E::PrimaryKey as PrimaryKeyTrait>::ValueType as FromStr>::Err| {
                AdminError::InvalidKey {
                    key: pk.to_string(),
                    details: e.to_string(),
                }
            },
        )
    }
}

#[async_trait]
impl<E, A> Controller for SeaOrmController<E, A>
where
    E: EntityTrait,
    E::Model: Serialize + DeserializeOwned + IntoActiveModel<A> + Sync,
    A: ActiveModelTrait<Entity = E> + ActiveModelBehavior + Send + 'static,
    <E::PrimaryKey as PrimaryKeyTrait>::ValueType: FromStr,
    <<E::PrimaryKey as PrimaryKeyTrait>::ValueType as FromStr>::Err: Display,
{
    fn resource(&self) -> &str {
        &self.resource
    }

    fn pk_field(&self) -> &str {
        &self.pk_field
    }

    fn per_page(&self) -> u64 {
        self.per_page
    }

    async fn list(&self, query: &ListQuery) -> AdminResult<ItemPage> {
        let mut select = E::find();

        for (key, value) in &query.filters {
            if let Some(registered) = self.filters.get(key) {
                select = registered.filter.apply(select, value);
            }
        }

        if let Some(spec) = &query.order_by {
            let (name, order) = match spec.strip_prefix('-') {
                Some(rest) => (rest, Order::Desc),
                None => (spec.as_str(), Order::Asc),
            };
            match E::Column::from_str(name) {
                Ok(column) => select = select.order_by(column, order),
                Err(_) => {
                    tracing::debug!(column = name, "ignoring unknown order_by column");
                }
            }
        } else if let Some((name, order)) = &self.default_order {
            if let Ok(column) = E::Column::from_str(name) {
                select = select.order_by(column, order.clone());
            }
        }

        let per_page = query.per_page.unwrap_or(self.per_page).max(1);
        let page = query.page.max(1);
        let paginator = select.paginate(self.db.as_ref(), per_page);
        let counts = paginator
            .num_items_and_pages()
            .await
            .map_err(AdminError::database)?;
        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(AdminError::database)?;

        let items = models
            .into_iter()
            .map(|model| serde_json::to_value(model).map_err(AdminError::database))
            .collect::<AdminResult<Vec<Value>>>()?;

        Ok(ItemPage {
            items,
            total: counts.number_of_items,
            page,
            pages: counts.number_of_pages,
        })
    }

    async fn get(&self, pk: &str) -> AdminResult<Option<Value>> {
        let key = self.parse_pk(pk)?;
        let model = E::find_by_id(key)
            .one(self.db.as_ref())
            .await
            .map_err(AdminError::database)?;
        model
            .map(|m| serde_json::to_value(m).map_err(AdminError::database))
            .transpose()
    }

    async fn create(&self, mut payload: Value) -> AdminResult<Value> {
        // the key is assigned by the database, never by the payload
        match payload.as_object_mut() {
            Some(object) => {
                object.remove(&self.pk_field);
            }
            None => {
                return Err(AdminError::Validation {
                    errors: vec!["payload must be a JSON object".to_string()],
                })
            }
        }
        let active = A::from_json(payload).map_err(|e| AdminError::Validation {
            errors: vec![e.to_string()],
        })?;
        let model = active
            .insert(self.db.as_ref())
            .await
            .map_err(AdminError::database)?;
        serde_json::to_value(model).map_err(AdminError::database)
    }

    async fn update(&self, pk: &str, payload: Value) -> AdminResult<Value> {
        let key = self.parse_pk(pk)?;
        let model = E::find_by_id(key)
            .one(self.db.as_ref())
            .await
            .map_err(AdminError::database)?
            .ok_or_else(|| AdminError::not_found(self.resource.clone(), pk))?;
        let Some(source) = payload.as_object() else {
            return Err(AdminError::Validation {
                errors: vec!["payload must be a JSON object".to_string()],
            });
        };

        // merge the payload over the current row so partial updates keep
        // untouched fields; the key itself is not overwritable
        let mut merged = serde_json::to_value(&model).map_err(AdminError::database)?;
        if let Some(target) = merged.as_object_mut() {
            for (field, value) in source {
                if field != &self.pk_field {
                    target.insert(field.clone(), value.clone());
                }
            }
        }

        let mut active = model.into_active_model();
        active.set_from_json(merged).map_err(|e| AdminError::Validation {
            errors: vec![e.to_string()],
        })?;
        let model = active
            .update(self.db.as_ref())
            .await
            .map_err(AdminError::database)?;
        serde_json::to_value(model).map_err(AdminError::database)
    }

    async fn delete(&self, pk: &str) -> AdminResult<()> {
        let key = self.parse_pk(pk)?;
        let result = E::delete_by_id(key)
            .exec(self.db.as_ref())
            .await
            .map_err(AdminError::database)?;
        if result.rows_affected == 0 {
            return Err(AdminError::not_found(self.resource.clone(), pk));
        }
        Ok(())
    }

    fn filter_specs(&self) -> Vec<FilterSpec> {
        self.filters
            .iter()
            .map(|(key, registered)| FilterSpec {
                key: key.clone(),
                label: registered.label.clone(),
                input: registered.filter.input(),
            })
            .collect()
    }

    fn action_names(&self) -> Vec<String> {
        self.actions.keys().cloned().collect()
    }

    async fn execute_action(&self, action: &str, ids: &[String]) -> AdminResult<u64> {
        let registered = self
            .actions
            .get(action)
            .ok_or_else(|| AdminError::UnknownAction {
                name: action.to_string(),
            })?;
        registered
            .execute(self.db.as_ref(), ids)
            .await
            .map_err(AdminError::database)
    }
}
