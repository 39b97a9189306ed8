use sea_orm_migration::prelude::*;

/// Embedded migrations mirroring the café schema the forecast reads from.
///
/// Production databases already carry these tables; the migrator exists for
/// local databases, the seed binary and the integration tests.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250429_000001_create_producto_table::Migration),
            Box::new(m20250429_000002_create_pedido_table::Migration),
            Box::new(m20250429_000003_create_detallepedido_table::Migration),
            Box::new(m20250429_000004_create_prediccion_table::Migration),
            Box::new(m20250609_000005_create_combo_tables::Migration),
        ]
    }
}

mod m20250429_000001_create_producto_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250429_000001_create_producto_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Producto::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Producto::IdProducto)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Producto::Nombre).string_len(100).not_null())
                        .col(ColumnDef::new(Producto::Descripcion).text().null())
                        .col(ColumnDef::new(Producto::IdCategoria).integer().null())
                        .col(
                            ColumnDef::new(Producto::Precio)
                                .decimal_len(10, 2)
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Producto::Disponibilidad)
                                .boolean()
                                .null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Producto::Eliminado)
                                .boolean()
                                .null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Producto::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Producto {
        Table,
        IdProducto,
        Nombre,
        Descripcion,
        IdCategoria,
        Precio,
        Disponibilidad,
        Eliminado,
    }
}

mod m20250429_000002_create_pedido_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250429_000002_create_pedido_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Pedido::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Pedido::IdPedido)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Pedido::IdUsuarioMesero).integer().not_null())
                        .col(ColumnDef::new(Pedido::FechaHoraRegistro).date_time().null())
                        .col(ColumnDef::new(Pedido::EstadoActual).integer().not_null())
                        .col(
                            ColumnDef::new(Pedido::Eliminado)
                                .boolean()
                                .null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_pedido_estado")
                        .table(Pedido::Table)
                        .col(Pedido::EstadoActual)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Pedido::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Pedido {
        Table,
        IdPedido,
        IdUsuarioMesero,
        FechaHoraRegistro,
        EstadoActual,
        Eliminado,
    }
}

mod m20250429_000003_create_detallepedido_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250429_000003_create_detallepedido_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Detallepedido::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Detallepedido::IdDetalle)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Detallepedido::IdPedido).integer().not_null())
                        .col(ColumnDef::new(Detallepedido::IdProducto).integer().not_null())
                        .col(ColumnDef::new(Detallepedido::Cantidad).integer().not_null())
                        .col(ColumnDef::new(Detallepedido::Comentario).string().null())
                        .col(
                            ColumnDef::new(Detallepedido::PrecioUnitario)
                                .decimal_len(10, 2)
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Detallepedido::Eliminado)
                                .boolean()
                                .null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_detallepedido")
                        .table(Detallepedido::Table)
                        .col(Detallepedido::IdPedido)
                        .col(Detallepedido::IdProducto)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Detallepedido::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Detallepedido {
        Table,
        IdDetalle,
        IdPedido,
        IdProducto,
        Cantidad,
        Comentario,
        PrecioUnitario,
        Eliminado,
    }
}

mod m20250429_000004_create_prediccion_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250429_000004_create_prediccion_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Prediccion::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Prediccion::IdPrediccion)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Prediccion::IdProducto).integer().not_null())
                        .col(ColumnDef::new(Prediccion::FechaPredicha).date().not_null())
                        .col(ColumnDef::new(Prediccion::FechaGenerada).date_time().null())
                        .col(
                            ColumnDef::new(Prediccion::DemandaPrevista)
                                .integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Prediccion::TipoSugerencia).string_len(50).null())
                        .col(ColumnDef::new(Prediccion::SugerenciaDescripcion).string().null())
                        .col(
                            ColumnDef::new(Prediccion::Aceptado)
                                .boolean()
                                .null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Prediccion::IdUsuarioAccion).integer().null())
                        .col(
                            ColumnDef::new(Prediccion::Eliminado)
                                .boolean()
                                .null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_prediccion_producto")
                        .table(Prediccion::Table)
                        .col(Prediccion::IdProducto)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Prediccion::Table).to_owned())
                .await
        }
    }

    #[derive(Iden)]
    enum Prediccion {
        Table,
        IdPrediccion,
        IdProducto,
        FechaPredicha,
        FechaGenerada,
        DemandaPrevista,
        TipoSugerencia,
        SugerenciaDescripcion,
        Aceptado,
        IdUsuarioAccion,
        Eliminado,
    }
}

mod m20250609_000005_create_combo_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20250609_000005_create_combo_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager.create_table(combo_table()).await?;
            manager.create_table(detallecombo_table()).await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Detallecombo::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Combo::Table).to_owned())
                .await
        }
    }

    fn combo_table() -> TableCreateStatement {
        Table::create()
            .table(Combo::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Combo::IdCombo)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Combo::Nombre).string_len(100).not_null())
            .col(ColumnDef::new(Combo::Descripcion).text().null())
            .col(ColumnDef::new(Combo::Precio).decimal_len(10, 2).not_null())
            .col(
                ColumnDef::new(Combo::Disponibilidad)
                    .boolean()
                    .not_null()
                    .default(true),
            )
            .col(
                ColumnDef::new(Combo::Eliminado)
                    .boolean()
                    .not_null()
                    .default(false),
            )
            .col(ColumnDef::new(Combo::CreatedAt).date_time().null())
            .col(ColumnDef::new(Combo::UpdatedAt).date_time().null())
            .to_owned()
    }

    fn detallecombo_table() -> TableCreateStatement {
        Table::create()
            .table(Detallecombo::Table)
            .if_not_exists()
            .col(
                ColumnDef::new(Detallecombo::IdDetallecombo)
                    .big_integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(Detallecombo::IdCombo).big_integer().not_null())
            .col(
                ColumnDef::new(Detallecombo::IdProducto)
                    .big_integer()
                    .not_null(),
            )
            .col(
                ColumnDef::new(Detallecombo::Cantidad)
                    .integer()
                    .not_null()
                    .default(1),
            )
            .col(ColumnDef::new(Detallecombo::CreatedAt).date_time().null())
            .col(ColumnDef::new(Detallecombo::UpdatedAt).date_time().null())
            .to_owned()
    }

    #[derive(Iden)]
    enum Combo {
        Table,
        IdCombo,
        Nombre,
        Descripcion,
        Precio,
        Disponibilidad,
        Eliminado,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(Iden)]
    enum Detallecombo {
        Table,
        IdDetallecombo,
        IdCombo,
        IdProducto,
        Cantidad,
        CreatedAt,
        UpdatedAt,
    }

}
