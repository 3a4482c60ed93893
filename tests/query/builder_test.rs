//! A minimal `SqlQueryBuilder` used to check that descriptors carry what a
//! SQL layer needs when resolved against a reflected table.

#[cfg(test)]
mod tests {
    use dbmeta::metadata::{Column, Table};
    use dbmeta::query::{
        CountQuery, DestroyByIdQuery, DestroyQuery, ExistsQuery, FilterParser, FindByIdQuery,
        FindOneQuery, FindQuery, InsertQuery, QueryValues, SqlQueryBuilder, UpdateByIdQuery,
        UpdateQuery, WhereQueryPart,
    };
    use dbmeta::FieldType;

    #[derive(Debug, thiserror::Error, PartialEq)]
    enum BuildError {
        #[error("unknown field {0} on {1}")]
        UnknownField(String, String),
        #[error("{0} has no primary key")]
        NoPrimaryKey(String),
    }

    struct TestSqlBuilder;

    impl TestSqlBuilder {
        fn column<'t>(&self, table: &'t Table, field_name: &str) -> Result<&'t Column, BuildError> {
            table
                .column_by_field(field_name)
                .ok_or_else(|| BuildError::UnknownField(field_name.to_string(), table.table_name.clone()))
        }

        fn select_list(&self, table: &Table, fields: &[String]) -> Result<String, BuildError> {
            if fields.is_empty() {
                return Ok("*".to_string());
            }
            let columns = fields
                .iter()
                .map(|f| self.column(table, f).map(|c| c.column_name.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(columns.join(", "))
        }

        fn where_clause(&self, table: &Table, parts: &[WhereQueryPart]) -> Result<String, BuildError> {
            if parts.is_empty() {
                return Ok(String::new());
            }
            let conditions = parts
                .iter()
                .enumerate()
                .map(|(i, part)| {
                    let column = self.column(table, &part.field_name)?;
                    Ok(format!("{} {} ${}", column.column_name, part.operator, i + 1))
                })
                .collect::<Result<Vec<_>, BuildError>>()?;
            Ok(format!(" WHERE {}", conditions.join(" AND ")))
        }

        fn id_clause(&self, table: &Table) -> Result<String, BuildError> {
            let pk = table
                .primary_key_columns
                .first()
                .ok_or_else(|| BuildError::NoPrimaryKey(table.table_name.clone()))?;
            Ok(format!(" WHERE {} = $1", pk.column_name))
        }
    }

    impl SqlQueryBuilder for TestSqlBuilder {
        type Error = BuildError;

        fn build_find_by_id_query(&self, query: &FindByIdQuery, table: &Table) -> Result<String, BuildError> {
            let fields = query.fields.as_ref().map(|f| f.included.as_slice()).unwrap_or_default();
            Ok(format!(
                "SELECT {} FROM {}{}",
                self.select_list(table, fields)?,
                table.qualified_name(),
                self.id_clause(table)?
            ))
        }

        fn build_find_query(&self, query: &FindQuery, table: &Table) -> Result<String, BuildError> {
            let fields = query.fields.as_ref().map(|f| f.included.as_slice()).unwrap_or_default();
            let mut sql = format!(
                "SELECT {} FROM {}{}",
                self.select_list(table, fields)?,
                table.qualified_name(),
                self.where_clause(table, &query.where_parts)?
            );
            if let Some(order) = &query.order_by {
                let items = order
                    .order_by
                    .iter()
                    .map(|item| {
                        let column = self.column(table, &item.field_name)?;
                        Ok(format!("{} {}", column.column_name, item.direction.as_str().to_uppercase()))
                    })
                    .collect::<Result<Vec<_>, BuildError>>()?;
                sql.push_str(&format!(" ORDER BY {}", items.join(", ")));
            }
            if let Some(limit) = query.limit {
                sql.push_str(&format!(" LIMIT {}", limit.limit_to));
            }
            if let Some(skip) = query.skip {
                sql.push_str(&format!(" OFFSET {}", skip.skip_over));
            }
            Ok(sql)
        }

        fn build_find_one_query(&self, query: &FindOneQuery, table: &Table) -> Result<String, BuildError> {
            let find = FindQuery {
                fields: query.fields.clone(),
                where_parts: query.where_parts.clone(),
                order_by: query.order_by.clone(),
                limit: Some(dbmeta::query::LimitQueryPart { limit_to: 1 }),
                skip: query.skip,
            };
            self.build_find_query(&find, table)
        }

        fn build_count_query(&self, query: &CountQuery, table: &Table) -> Result<String, BuildError> {
            Ok(format!(
                "SELECT COUNT(*) FROM {}{}",
                table.qualified_name(),
                self.where_clause(table, &query.where_parts)?
            ))
        }

        fn build_exists_query(&self, _query: &ExistsQuery, table: &Table) -> Result<String, BuildError> {
            Ok(format!(
                "SELECT EXISTS (SELECT 1 FROM {}{})",
                table.qualified_name(),
                self.id_clause(table)?
            ))
        }

        fn build_insert_query(&self, query: &InsertQuery, table: &Table) -> Result<String, BuildError> {
            let columns = query
                .data
                .keys()
                .map(|f| self.column(table, f).map(|c| c.column_name.clone()))
                .collect::<Result<Vec<_>, _>>()?;
            let params: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
            Ok(format!(
                "INSERT INTO {} ({}) VALUES ({})",
                table.qualified_name(),
                columns.join(", "),
                params.join(", ")
            ))
        }

        fn build_destroy_by_id_query(
            &self,
            _query: &DestroyByIdQuery,
            table: &Table,
        ) -> Result<String, BuildError> {
            Ok(format!("DELETE FROM {}{}", table.qualified_name(), self.id_clause(table)?))
        }

        fn build_destroy_query(&self, query: &DestroyQuery, table: &Table) -> Result<String, BuildError> {
            Ok(format!(
                "DELETE FROM {}{}",
                table.qualified_name(),
                self.where_clause(table, &query.where_parts)?
            ))
        }

        fn build_update_by_id_query(
            &self,
            query: &UpdateByIdQuery,
            table: &Table,
        ) -> Result<String, BuildError> {
            let assignments = query
                .data
                .keys()
                .enumerate()
                .map(|(i, f)| self.column(table, f).map(|c| format!("{} = ${}", c.column_name, i + 2)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!(
                "UPDATE {} SET {}{}",
                table.qualified_name(),
                assignments.join(", "),
                self.id_clause(table)?
            ))
        }

        fn build_update_query(&self, query: &UpdateQuery, table: &Table) -> Result<String, BuildError> {
            let assignments = query
                .data
                .keys()
                .map(|f| self.column(table, f).map(|c| format!("{} = ?", c.column_name)))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!(
                "UPDATE {} SET {}{}",
                table.qualified_name(),
                assignments.join(", "),
                self.where_clause(table, &query.where_parts)?
            ))
        }
    }

    fn column(column_name: &str, field_name: &str, field_type: FieldType, data_type: &str) -> Column {
        Column {
            column_name: column_name.to_string(),
            field_name: field_name.to_string(),
            field_name_lower_case: field_name.to_lowercase(),
            field_type,
            data_type: data_type.to_string(),
            data_type_size: None,
            is_nullable: false,
            has_default: false,
            is_primary_key_column: false,
            is_unique: false,
            is_auto_increment_column: false,
            auto_increment_type: None,
        }
    }

    fn customer_table() -> Table {
        let mut id = column("customer_id", "CustomerId", FieldType::Int, "integer");
        id.is_primary_key_column = true;
        let columns = vec![
            id.clone(),
            column("email", "Email", FieldType::String, "text"),
            column("created_at", "CreatedAt", FieldType::DateTime, "timestamp"),
        ];

        Table {
            database_name: "shop".to_string(),
            schema_name: "public".to_string(),
            table_name: "customer".to_string(),
            model_name: "Customer".to_string(),
            model_name_lower_case: "customer".to_string(),
            model_name_lower_case_plural: "customers".to_string(),
            insert_columns: columns[1..].to_vec(),
            update_columns: columns[1..].to_vec(),
            columns,
            foreign_keys: vec![],
            primary_key_columns: vec![id],
            has_primary_keys: true,
            auto_increment: None,
        }
    }

    #[test]
    fn test_find_query_from_url() {
        let mut find = FindQuery::default();
        FilterParser::new()
            .parse_find_query(
                &mut find,
                &QueryValues::parse(
                    "filter[fields]=customerid,email&filter[where][createdat][gte]=2024-01-01\
                     &filter[order]=email ASC&filter[limit]=10&filter[skip]=20",
                ),
            )
            .unwrap();

        let sql = TestSqlBuilder.build_find_query(&find, &customer_table()).unwrap();
        insta::assert_snapshot!(
            sql,
            @"SELECT customer_id, email FROM public.customer WHERE created_at gte $1 ORDER BY email ASC LIMIT 10 OFFSET 20"
        );
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut find = FindQuery::default();
        FilterParser::new()
            .parse_find_query(&mut find, &QueryValues::parse("filter[order]=nickname DESC"))
            .unwrap();

        let err = TestSqlBuilder
            .build_find_query(&find, &customer_table())
            .unwrap_err();
        assert_eq!(err, BuildError::UnknownField("nickname".to_string(), "customer".to_string()));
    }

    #[test]
    fn test_find_by_id_and_find_one() {
        let table = customer_table();

        let sql = TestSqlBuilder
            .build_find_by_id_query(&FindByIdQuery::new("7"), &table)
            .unwrap();
        assert_eq!(sql, "SELECT * FROM public.customer WHERE customer_id = $1");

        let sql = TestSqlBuilder
            .build_find_one_query(&FindOneQuery::default(), &table)
            .unwrap();
        assert_eq!(sql, "SELECT * FROM public.customer LIMIT 1");
    }

    #[test]
    fn test_count_and_destroy() {
        let table = customer_table();
        let mut count = CountQuery::default();
        FilterParser::new()
            .parse_count_query(&mut count, &QueryValues::parse("filter[where][email][like]=%25@x.org"))
            .unwrap();

        assert_eq!(
            TestSqlBuilder.build_count_query(&count, &table).unwrap(),
            "SELECT COUNT(*) FROM public.customer WHERE email like $1"
        );
        assert_eq!(
            TestSqlBuilder
                .build_destroy_query(&DestroyQuery::default(), &table)
                .unwrap(),
            "DELETE FROM public.customer"
        );
        assert_eq!(
            TestSqlBuilder
                .build_destroy_by_id_query(&DestroyByIdQuery { model_id: "1".to_string() }, &table)
                .unwrap(),
            "DELETE FROM public.customer WHERE customer_id = $1"
        );
    }

    #[test]
    fn test_writes_resolve_field_names() {
        let table = customer_table();

        let mut insert = InsertQuery::default();
        insert.data.insert("Email".to_string(), "a@x.org".to_string());
        insert.data.insert("CreatedAt".to_string(), "2024-01-01".to_string());
        assert_eq!(
            TestSqlBuilder.build_insert_query(&insert, &table).unwrap(),
            "INSERT INTO public.customer (email, created_at) VALUES ($1, $2)"
        );

        let mut update = UpdateByIdQuery {
            model_id: "3".to_string(),
            ..Default::default()
        };
        update.data.insert("email".to_string(), "b@x.org".to_string());
        assert_eq!(
            TestSqlBuilder.build_update_by_id_query(&update, &table).unwrap(),
            "UPDATE public.customer SET email = $2 WHERE customer_id = $1"
        );
    }

    #[test]
    fn test_exists_needs_primary_key() {
        let mut table = customer_table();
        let query = ExistsQuery {
            model_id: "1".to_string(),
        };
        assert!(TestSqlBuilder.build_exists_query(&query, &table).is_ok());

        table.primary_key_columns.clear();
        table.has_primary_keys = false;
        assert_eq!(
            TestSqlBuilder.build_exists_query(&query, &table).unwrap_err(),
            BuildError::NoPrimaryKey("customer".to_string())
        );
    }
}
