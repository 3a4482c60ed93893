#[cfg(test)]
mod tests {
    use dbmeta::query::{
        FilterError, FilterParser, FindByIdQuery, FindOneQuery, FindQuery, QueryValues,
        SortDirection, WhereOperator,
    };

    fn parse_find(query: &str) -> Result<FindQuery, FilterError> {
        let mut find = FindQuery::default();
        FilterParser::new().parse_find_query(&mut find, &QueryValues::parse(query))?;
        Ok(find)
    }

    #[test]
    fn test_absent_filters_stay_unset() {
        let find = parse_find("").unwrap();

        assert!(find.limit.is_none());
        assert!(find.skip.is_none());
        assert!(find.order_by.is_none());
        assert!(find.fields.is_none());
        assert!(find.where_parts.is_empty());
    }

    #[test]
    fn test_limit() {
        let find = parse_find("filter[limit]=25").unwrap();
        assert_eq!(find.limit.unwrap().limit_to, 25);
    }

    #[test]
    fn test_limit_zero_is_set() {
        let find = parse_find("filter[limit]=0").unwrap();
        assert_eq!(find.limit.unwrap().limit_to, 0);
    }

    #[test]
    fn test_repeated_limit_last_value_wins() {
        let find = parse_find("filter[limit]=5&filter[limit]=7").unwrap();
        assert_eq!(find.limit.unwrap().limit_to, 7);
    }

    #[test]
    fn test_skip() {
        let find = parse_find("filter[skip]=3").unwrap();
        assert_eq!(find.skip.unwrap().skip_over, 3);
    }

    #[test]
    fn test_skip_negative_is_error() {
        let mut find = FindQuery::default();
        let values = QueryValues::parse("filter[skip]=-1");
        let err = FilterParser::new()
            .parse_find_query(&mut find, &values)
            .unwrap_err();

        match err {
            FilterError::InvalidNumber { filter, value, .. } => {
                assert_eq!(filter, "skip");
                assert_eq!(value, "-1");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(find.skip.is_none());
    }

    #[test]
    fn test_skip_not_a_number_is_error() {
        let err = parse_find("filter[skip]=abc").unwrap_err();
        assert!(matches!(err, FilterError::InvalidNumber { filter: "skip", .. }));
        insta::assert_snapshot!(
            err.to_string(),
            @r#"invalid value "abc" for the skip filter, it is not a valid integer: invalid digit found in string"#
        );
    }

    #[test]
    fn test_signed_counts_are_errors() {
        let err = parse_find("filter[limit]=%2B5").unwrap_err();
        match err {
            FilterError::InvalidNumber { filter, value, .. } => {
                assert_eq!(filter, "limit");
                assert_eq!(value, "+5");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let mut find = FindQuery::default();
        let values: QueryValues = [("filter[skip]", "+3")].into_iter().collect();
        let err = FilterParser::new()
            .parse_find_query(&mut find, &values)
            .unwrap_err();
        assert!(matches!(err, FilterError::InvalidNumber { filter: "skip", .. }));
        assert!(find.skip.is_none());
    }

    #[test]
    fn test_non_ascii_filter_keyword_is_ignored() {
        let find = parse_find("filter[gr%C3%B6%C3%9Fe]=1&filter[limit]=2").unwrap();
        assert_eq!(find.limit.unwrap().limit_to, 2);
    }

    #[test]
    fn test_order_with_non_ascii_field_produces_no_part() {
        let find = parse_find("filter[order]=%C3%A9t%C3%A9 ASC").unwrap();
        assert!(find.order_by.is_none());
    }

    #[test]
    fn test_limit_not_a_number_is_error() {
        let err = parse_find("filter[limit]=ten").unwrap_err();
        assert!(matches!(err, FilterError::InvalidNumber { filter: "limit", .. }));
    }

    #[test]
    fn test_order() {
        let find = parse_find("filter[order]=abc ASC,somefield DESC").unwrap();
        let order = find.order_by.unwrap().order_by;

        assert_eq!(order.len(), 2);
        assert_eq!(order[0].field_name, "abc");
        assert_eq!(order[0].direction, SortDirection::Asc);
        assert_eq!(order[1].field_name, "somefield");
        assert_eq!(order[1].direction, SortDirection::Desc);
    }

    #[test]
    fn test_order_direction_case_insensitive() {
        let find = parse_find("filter[order]=name desc  age Asc").unwrap();
        let order = find.order_by.unwrap().order_by;

        assert_eq!(order[0].direction.as_str(), "desc");
        assert_eq!(order[1].field_name, "age");
        assert_eq!(order[1].direction.as_str(), "asc");
    }

    #[test]
    fn test_order_without_pairs_produces_no_part() {
        let find = parse_find("filter[order]=name").unwrap();
        assert!(find.order_by.is_none());
    }

    #[test]
    fn test_order_without_pairs_keeps_previous_order() {
        let find = parse_find("filter[order]=name ASC&filter[order]=garbage").unwrap();
        let order = find.order_by.unwrap().order_by;
        assert_eq!(order.len(), 1);
        assert_eq!(order[0].field_name, "name");
    }

    #[test]
    fn test_unknown_filter_names_type_and_query_kind() {
        let err = parse_find("filter[bogus]=1").unwrap_err();

        assert_eq!(
            err,
            FilterError::UnknownFilter {
                filter_type: "bogus".to_string(),
                query_kind: "findQuery",
            }
        );
        insta::assert_snapshot!(err.to_string(), @"bogus is not a valid filter for a findQuery");
    }

    #[test]
    fn test_unrelated_keys_are_ignored() {
        let find = parse_find("page=2&sort=name&filters[limit]=3").unwrap();
        assert_eq!(find, FindQuery::default());
    }

    #[test]
    fn test_key_case_and_whitespace_insensitive() {
        let find = parse_find("FILTER[LIMIT]=3&%20filter%20[%20skip%20]%20=4").unwrap();

        assert_eq!(find.limit.unwrap().limit_to, 3);
        assert_eq!(find.skip.unwrap().skip_over, 4);
    }

    #[test]
    fn test_path_on_scalar_filter_is_error() {
        let err = parse_find("filter[limit][max]=3").unwrap_err();
        assert_eq!(err, FilterError::InvalidPath("filter[limit][max]".to_string()));
    }

    #[test]
    fn test_error_keeps_earlier_parts() {
        let mut find = FindQuery::default();
        let values = QueryValues::parse("filter[limit]=5&filter[bogus]=1&filter[skip]=2");

        assert!(FilterParser::new()
            .parse_find_query(&mut find, &values)
            .is_err());
        assert_eq!(find.limit.unwrap().limit_to, 5);
        assert!(find.skip.is_none());
    }

    #[test]
    fn test_full_find_query() {
        let find = parse_find(
            "filter[where][abc][gt]=123&filter[limit]=5&filter[limit]=7\
             &filter[order]=abc ASC,somefiled DESC&filter[skip]=3",
        )
        .unwrap();

        assert_eq!(find.limit.unwrap().limit_to, 7);
        assert_eq!(find.skip.unwrap().skip_over, 3);
        assert_eq!(find.order_by.as_ref().unwrap().order_by.len(), 2);
        assert_eq!(find.where_parts.len(), 1);
        assert_eq!(find.where_parts[0].field_name, "abc");
        assert_eq!(find.where_parts[0].operator, WhereOperator::Gt);
        assert_eq!(find.where_parts[0].value, "123");
    }

    #[test]
    fn test_find_by_id_accepts_only_fields() {
        let parser = FilterParser::new();

        let mut by_id = FindByIdQuery::new("42");
        parser
            .parse_find_by_id_query(&mut by_id, &QueryValues::parse("filter[fields]=id,name"))
            .unwrap();
        assert_eq!(by_id.model_id, "42");
        assert_eq!(by_id.fields.unwrap().included, vec!["id", "name"]);

        let mut by_id = FindByIdQuery::new("42");
        let err = parser
            .parse_find_by_id_query(&mut by_id, &QueryValues::parse("filter[limit]=1"))
            .unwrap_err();
        insta::assert_snapshot!(err.to_string(), @"limit is not a valid filter for a findByIdQuery");
    }

    #[test]
    fn test_find_one_rejects_limit() {
        let parser = FilterParser::new();

        let mut find_one = FindOneQuery::default();
        parser
            .parse_find_one_query(
                &mut find_one,
                &QueryValues::parse("filter[order]=name ASC&filter[skip]=1"),
            )
            .unwrap();
        assert!(find_one.order_by.is_some());
        assert_eq!(find_one.skip.unwrap().skip_over, 1);

        let err = parser
            .parse_find_one_query(&mut FindOneQuery::default(), &QueryValues::parse("filter[limit]=1"))
            .unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownFilter {
                filter_type: "limit".to_string(),
                query_kind: "findOneQuery",
            }
        );
    }

    #[test]
    fn test_manually_built_values() {
        let mut values = QueryValues::new();
        values.append("filter[limit]", "5");
        values.append("filter[limit]", "9");

        let mut find = FindQuery::default();
        FilterParser::new().parse_find_query(&mut find, &values).unwrap();
        assert_eq!(find.limit.unwrap().limit_to, 9);
    }

    #[test]
    fn test_parser_shared_between_threads() {
        let parser = FilterParser::new();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4u64)
                .map(|i| {
                    let parser = &parser;
                    scope.spawn(move || {
                        let mut find = FindQuery::default();
                        let values = QueryValues::parse(&format!("filter[limit]={}", i));
                        parser.parse_find_query(&mut find, &values).unwrap();
                        find.limit.unwrap().limit_to
                    })
                })
                .collect();

            let limits: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
            assert_eq!(limits, vec![0, 1, 2, 3]);
        });
    }
}
