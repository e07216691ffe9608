//! Products, warehouses and suppliers.
//!
//! The three resources share the same REST shape, so their methods are
//! generated by one macro.

use depot_core::models::{
    Product, ProductInput, Supplier, SupplierInput, Warehouse, WarehouseInput,
};
use depot_core::{ProductId, SupplierId, WarehouseId};
use reqwest::Method;
use tracing::instrument;

use super::{BackendClient, BackendError};

macro_rules! crud_methods {
    (
        $resource:literal, $id:ty, $entity:ty, $input:ty,
        list: $list:ident, get: $get:ident, create: $create:ident,
        update: $update:ident, delete: $delete:ident $(,)?
    ) => {
        impl BackendClient {
            #[doc = concat!("List every entry of `/", $resource, "`.")]
            ///
            /// # Errors
            ///
            /// Returns `BackendError` if the request fails or the body does not decode.
            #[instrument(skip(self))]
            pub async fn $list(&self) -> Result<Vec<$entity>, BackendError> {
                self.get_json($resource).await
            }

            #[doc = concat!("Fetch one entry of `/", $resource, "`.")]
            ///
            /// # Errors
            ///
            /// Returns `BackendError::NotFound` if it does not exist.
            #[instrument(skip(self), fields(id = %id))]
            pub async fn $get(&self, id: $id) -> Result<$entity, BackendError> {
                self.get_json(&format!(concat!($resource, "/{}"), id)).await
            }

            #[doc = concat!("Create an entry in `/", $resource, "`.")]
            ///
            /// # Errors
            ///
            /// Returns `BackendError` if the backend rejects the payload.
            #[instrument(skip(self, input))]
            pub async fn $create(&self, input: &$input) -> Result<(), BackendError> {
                self.send_json_unit(Method::POST, $resource, input).await
            }

            #[doc = concat!("Replace an entry in `/", $resource, "`.")]
            ///
            /// # Errors
            ///
            /// Returns `BackendError` if the backend rejects the payload.
            #[instrument(skip(self, input), fields(id = %id))]
            pub async fn $update(&self, id: $id, input: &$input) -> Result<(), BackendError> {
                self.send_json_unit(Method::PUT, &format!(concat!($resource, "/{}"), id), input)
                    .await
            }

            #[doc = concat!("Delete an entry from `/", $resource, "`.")]
            ///
            /// # Errors
            ///
            /// Returns `BackendError` if the backend refuses the deletion.
            #[instrument(skip(self), fields(id = %id))]
            pub async fn $delete(&self, id: $id) -> Result<(), BackendError> {
                self.delete(&format!(concat!($resource, "/{}"), id)).await
            }
        }
    };
}

crud_methods!(
    "products", ProductId, Product, ProductInput,
    list: list_products, get: get_product, create: create_product,
    update: update_product, delete: delete_product,
);

crud_methods!(
    "warehouses", WarehouseId, Warehouse, WarehouseInput,
    list: list_warehouses, get: get_warehouse, create: create_warehouse,
    update: update_warehouse, delete: delete_warehouse,
);

crud_methods!(
    "suppliers", SupplierId, Supplier, SupplierInput,
    list: list_suppliers, get: get_supplier, create: create_supplier,
    update: update_supplier, delete: delete_supplier,
);
