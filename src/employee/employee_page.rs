//! Displays an employee's details, transactions and balance.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

use crate::{
    Error,
    db::lock_connection,
    employee::{EmployeeDetails, EmployeeId, EmployeeState, get_employee},
    endpoints,
    html::{
        CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, format_amount,
    },
    timezone::local_offset_or_error,
    transaction::{TransactionSummary, TransactionView, list_transactions},
};

/// The number of transactions shown on the employee page.
const TRANSACTION_LIMIT: u32 = 200;

struct EmployeePageData {
    employee: EmployeeDetails,
    transactions: Vec<TransactionView>,
    summary: TransactionSummary,
}

/// Renders the page for the employee with the ID in the path.
///
/// Unknown employees get the 404 page.
pub async fn get_employee_page(
    State(state): State<EmployeeState>,
    Path(employee_id): Path<EmployeeId>,
) -> Response {
    match load_employee_page_data(&state, &employee_id) {
        Ok(data) => employee_view(&data).into_response(),
        Err(error) => error.into_page_response(),
    }
}

fn load_employee_page_data(
    state: &EmployeeState,
    employee_id: &str,
) -> Result<EmployeePageData, Error> {
    let offset = local_offset_or_error(&state.local_timezone)?;
    let connection = lock_connection(&state.db_connection)?;

    let employee = get_employee(employee_id, &connection)?;
    let transactions = list_transactions(employee_id, TRANSACTION_LIMIT, &connection)?;
    let summary = TransactionSummary::new(&transactions);

    Ok(EmployeePageData {
        employee: EmployeeDetails::new(employee, offset),
        transactions: transactions
            .into_iter()
            .map(|transaction| TransactionView::new(transaction, offset))
            .collect(),
        summary,
    })
}

fn summary_card(label: &str, amount: f64) -> Markup {
    html!(
        div class=(CARD_STYLE)
        {
            div class="text-xs text-gray-500 dark:text-gray-400" { (label) }
            div class="text-lg font-semibold tabular-nums" data-amount="true" { (format_amount(amount)) }
        }
    )
}

fn detail_row(label: &str, value: Option<&str>) -> Markup {
    html!(
        div class="flex gap-2"
        {
            dt class="font-medium" { (label) ":" }
            dd { (value.unwrap_or("-")) }
        }
    )
}

fn employee_view(data: &EmployeePageData) -> Markup {
    let employee = &data.employee.item;

    let content = html!(
        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { (employee.name) }

                    a href=(endpoints::EMPLOYEES_VIEW) class=(LINK_STYLE) { "العودة إلى العملاء" }
                }

                div class="flex gap-6 flex-wrap"
                {
                    @if let Some(image_url) = &employee.image_url {
                        img src=(image_url) alt=(employee.name) class="w-32 h-32 rounded object-cover";
                    }

                    dl class="space-y-1 text-sm"
                    {
                        (detail_row("الرقم", Some(employee.id.as_str())))
                        (detail_row("العمر", Some(employee.age.to_string().as_str())))
                        (detail_row("العنوان", employee.address.as_deref()))
                        (detail_row("اسم الهوية", employee.identity_name.as_deref()))
                        (detail_row("نوع الهوية", employee.identity_type.as_deref()))
                        (detail_row("تاريخ الإضافة", employee.created_at.as_deref()))
                        (detail_row("آخر تحديث", data.employee.updated_at.as_deref()))
                    }
                }

                div class="grid grid-cols-1 sm:grid-cols-3 gap-4" id="summary"
                {
                    (summary_card("إجمالي الإيداعات", data.summary.total_deposits))
                    (summary_card("إجمالي السحوبات", data.summary.total_withdrawals))
                    (summary_card("الرصيد", data.summary.balance()))
                }

                h2 class="text-lg font-bold" { "المعاملات" }

                div class="w-full overflow-x-auto dark:bg-gray-800"
                {
                    table class="w-full text-sm text-right text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE) { "التاريخ" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "النوع" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "المبلغ" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "رقم الصندوق" }
                                th scope="col" class=(TABLE_CELL_STYLE) { "الوصف" }
                            }
                        }

                        tbody
                        {
                            @for transaction in &data.transactions {
                                tr class=(TABLE_ROW_STYLE)
                                {
                                    td class=(TABLE_CELL_STYLE)
                                    { (transaction.transaction_time.as_deref().unwrap_or("")) }
                                    td class=(TABLE_CELL_STYLE) { (transaction.transaction_type) }
                                    td class="px-6 py-4 tabular-nums"
                                    { (format_amount(transaction.amount)) }
                                    td class=(TABLE_CELL_STYLE)
                                    { (transaction.box_number.as_deref().unwrap_or("")) }
                                    td class=(TABLE_CELL_STYLE)
                                    { (transaction.description.as_deref().unwrap_or("")) }
                                }
                            }

                            @if data.transactions.is_empty() {
                                tr
                                {
                                    td
                                        colspan="5"
                                        class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                    {
                                        "لا توجد معاملات."
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base(&employee.name, &content)
}
