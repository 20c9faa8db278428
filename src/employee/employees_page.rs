//! Displays the employee listing with a search box.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    db::lock_connection,
    employee::{
        DEFAULT_LIST_LIMIT, EmployeeListItem, EmployeeState, SearchParams, list_employees,
        search_employees,
    },
    endpoints::{self, format_endpoint},
    html::{
        BUTTON_PRIMARY_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, link,
    },
    timezone::local_offset_or_error,
    validation::is_blank,
};

/// Renders the employees page.
///
/// With a non-blank `query` the table shows the search results, otherwise all
/// employees ordered by name.
pub async fn get_employees_page(
    State(state): State<EmployeeState>,
    Query(params): Query<SearchParams>,
) -> Response {
    match load_employees(&state, &params.query).await {
        Ok(employees) => employees_view(&params.query, &employees).into_response(),
        Err(error) => error.into_page_response(),
    }
}

async fn load_employees(
    state: &EmployeeState,
    query: &str,
) -> Result<Vec<EmployeeListItem>, Error> {
    let offset = local_offset_or_error(&state.local_timezone)?;

    let employees = if is_blank(query) {
        let connection = lock_connection(&state.db_connection)?;
        list_employees(&connection, DEFAULT_LIST_LIMIT)?
    } else {
        search_employees(state.db_connection.clone(), query).await?
    };

    Ok(employees
        .into_iter()
        .map(|employee| EmployeeListItem::new(employee, offset))
        .collect())
}

fn employees_view(query: &str, employees: &[EmployeeListItem]) -> Markup {
    let is_search = !is_blank(query);

    let table_row = |employee: &EmployeeListItem| {
        let employee_url = format_endpoint(endpoints::EMPLOYEE_VIEW, &[&employee.id]);

        html!(
            tr class=(TABLE_ROW_STYLE)
            {
                th
                    scope="row"
                    class="px-6 py-4 font-medium text-gray-900 whitespace-nowrap dark:text-white"
                {
                    (link(&employee_url, &employee.id))
                }

                td class=(TABLE_CELL_STYLE) { (employee.name) }
                td class=(TABLE_CELL_STYLE) { (employee.age) }
                td class=(TABLE_CELL_STYLE) { (employee.address.as_deref().unwrap_or("")) }
                td class=(TABLE_CELL_STYLE) { (employee.created_at.as_deref().unwrap_or("")) }
            }
        )
    };

    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "العملاء" }

                    form method="get" action=(endpoints::EMPLOYEES_VIEW) class="flex gap-2"
                    {
                        input
                            type="search"
                            name="query"
                            value=(query)
                            placeholder="ابحث بالاسم أو الرقم"
                            class=(FORM_TEXT_INPUT_STYLE);

                        button type="submit" class=(BUTTON_PRIMARY_STYLE) { "بحث" }
                    }
                }

                @if is_search {
                    p class="text-sm text-gray-600 dark:text-gray-400"
                    {
                        "نتائج البحث عن \"" (query) "\". "
                        a href=(endpoints::EMPLOYEES_VIEW) class=(LINK_STYLE) { "عرض الكل" }
                    }
                }

                div class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "الرقم" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "الاسم" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "العمر" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "العنوان" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "تاريخ الإضافة" }
                            }
                        }

                        tbody
                        {
                            @for employee in employees {
                                (table_row(employee))
                            }

                            @if employees.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        @if is_search { "لا توجد نتائج." } @else { "لا يوجد عملاء." }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("العملاء", &content)
}
