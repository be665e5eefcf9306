//! Operation documents shared by the tree-building tests.

/// Two connection queries sharing a fragment that spreads another fragment.
/// Whitespace and commas are deliberately irregular.
pub(super) const PRODUCTS_SEARCH: &str = r#"

    query productsSearch(

      $products_search: ProductsSearchInput!) {

      search(products: $products_search)


      {
        term
        products {
          edges {
            node {
              id           custom_title: title
              seller {
                ...SellerData
              }
            }
            cursor
          }
        }
      }

      search_users {
        term
        users {
          edges {
            node {
              id           custom_title: title
              seller {...SellerData}
            }
            cursor
          }
        }
      }
    }

    fragment SellerData on User {
      id, ...SellerDataB
    }

    fragment

    SellerDataB

    on

      User {
      name
    } "#;

/// An aggregation block guarded by `@include`, with `{condition}` standing
/// in for the condition value.
const AGGREGATIONS_TEMPLATE: &str = r#"
    query ProductsSearchPage($include_aggregations: Boolean!) {
      search {
        aggregations{directive} {
          departments {
            ...departmentAggregationFields
            __typename
          }
        }
        some_field
      }
    }

    fragment departmentAggregationFields on DepartmentAggregation {
      slug
      name
      __typename
    }
"#;

/// The aggregations document with `directive` (e.g. ` @include(if: true)`)
/// applied to the `aggregations` field.
pub(super) fn aggregations_query(directive: &str) -> String {
    AGGREGATIONS_TEMPLATE.replace("{directive}", directive)
}

/// Aliased copies of `search` whose arguments use variables and trailing
/// commas.
pub(super) const ALIASED_SEARCHES: &str = r#"
    query (
      $product_id: ID!,
      $first: Int!
    ){
      product(id: $product_id) {
        id
      }

      search(products: $search) {
        term
      }

      other_a: search(products: $search) {
        products(
          first: $first,
          sort: $sort,
        ) {
          total
        }
      }

      other_b: search(products: $search) {
        products(
          first: $first,
          sort: $sort
        ) {
          total
        }
      }
    }
"#;

/// `{ ...F0 }` followed by `count` fragments, each selecting one field and
/// spreading the next.
pub(super) fn fragment_chain(count: usize) -> String {
    let mut document = String::from("{ ...F0 }\n");
    for idx in 0..count {
        let next = if idx + 1 < count {
            format!(" ...F{}", idx + 1)
        } else {
            String::new()
        };
        document.push_str(&format!("fragment F{idx} on T {{ x{idx}{next} }}\n"));
    }
    document
}

/// Like [`fragment_chain`], but every fragment spreads the next one twice.
pub(super) fn doubled_fragment_chain(count: usize) -> String {
    let mut document = String::from("{ ...F0 }\n");
    for idx in 0..count {
        let next = if idx + 1 < count {
            format!(" ...F{0} ...F{0}", idx + 1)
        } else {
            String::new()
        };
        document.push_str(&format!("fragment F{idx} on T {{ x{next} }}\n"));
    }
    document
}
