//! The full resource catalog: one declarative descriptor per ERP
//! resource, covering field sets, enum sets, defaults, identifier
//! conventions, uniqueness, filters, and access control. The generic
//! pipeline in `service` is the only executor of these.

use serde_json::json;

use crate::descriptor::types::{
    FieldSpec, FieldType, ResourceDescriptor, Schema, SortDirection,
};
use crate::ident::IdStrategy;

const EMAIL_PATTERN: &str = r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$";
const GSTIN_PATTERN: &str = r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[1-9A-Z]{1}Z[0-9A-Z]{1}$";
const STATE_CODE_PATTERN: &str = r"^[0-9]{2}$";

fn str_req(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldType::String)
}

fn str_opt(name: &str) -> FieldSpec {
    FieldSpec::optional(name, FieldType::String)
}

fn num(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldType::Number)
}

fn num0(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldType::Number).with_minimum(0.0)
}

fn num_opt(name: &str) -> FieldSpec {
    FieldSpec::optional(name, FieldType::Number)
}

fn date(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldType::Date)
}

fn date_opt(name: &str) -> FieldSpec {
    FieldSpec::optional(name, FieldType::Date)
}

fn boolean(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldType::Boolean)
}

fn bool_def(name: &str, default: bool) -> FieldSpec {
    FieldSpec::required(name, FieldType::Boolean).with_default(json!(default))
}

fn enumerated(name: &str, values: &[&str]) -> FieldSpec {
    FieldSpec::required(
        name,
        FieldType::Enum(values.iter().map(|v| v.to_string()).collect()),
    )
}

fn enum_def(name: &str, values: &[&str], default: &str) -> FieldSpec {
    enumerated(name, values).with_default(json!(default))
}

fn array_of(name: &str, element: Schema) -> FieldSpec {
    FieldSpec::required(name, FieldType::Array(Box::new(FieldType::Object(element))))
}

fn string_array(name: &str) -> FieldSpec {
    FieldSpec::required(name, FieldType::Array(Box::new(FieldType::String)))
}

const UNITS_OF_MEASURE: &[&str] = &["PCS", "KG", "LTR", "MTR", "BOX"];

/// Every resource the backend serves. Order matches the original route
/// catalog; semantics per resource are spelled out by the descriptor.
pub fn catalog() -> Vec<ResourceDescriptor> {
    vec![
        batch_cards(),
        batch_releases(),
        credit_debit_notes(),
        customer_master(),
        dispatch_status_reports(),
        e_invoices(),
        e_way_bills(),
        employee_attendance(),
        employee_records(),
        faqs(),
        goods_issue_notes(),
        gst_audit_reports(),
        gst_configurations(),
        gst_reconciliation(),
        gst_returns(),
        gstin_records(),
        gstr2a(),
        hsn_codes(),
        inventory_zones(),
        invoices(),
        job_cards(),
        journal_entries(),
        leave_management(),
        material_revalidation(),
        payment_processing(),
        payroll_reports(),
        pdir_entries(),
        process_definitions(),
        production_inventory(),
        raw_material_master(),
        sales_orders(),
        sales_register(),
        sku_master(),
        standard_specifications(),
        stock_aging(),
        stock_categories(),
        stock_items(),
        tax_codes(),
        work_orders(),
    ]
}

fn batch_cards() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "batch-cards",
        "batch_cards",
        "batch_id",
        IdStrategy::prefixed("BATCH-"),
        Schema::new(vec![
            str_req("product_code"),
            str_req("batch_number"),
            date("start_date"),
            date("planned_end_date"),
            date("actual_end_date"),
            num("planned_quantity"),
            num("actual_quantity"),
            enum_def(
                "status",
                &["In Progress", "Completed", "Cancelled"],
                "In Progress",
            ),
            enum_def("quality_status", &["Pending", "Passed", "Failed"], "Pending"),
            str_opt("remarks"),
        ]),
    )
    .stamped_creator()
}

fn batch_releases() -> ResourceDescriptor {
    let condition = Schema::new(vec![
        str_req("condition_id"),
        str_req("description"),
        enumerated("status", &["Pending", "Completed", "Failed"]),
    ]);
    ResourceDescriptor::new(
        "batch-releases",
        "batch_releases",
        "release_id",
        IdStrategy::prefixed("REL"),
        Schema::new(vec![
            str_req("batch_id"),
            str_req("product_code"),
            date("release_date"),
            enumerated("quality_status", &["Approved", "Rejected", "On Hold"]),
            enumerated("release_type", &["Full", "Conditional", "Partial"]),
            array_of("conditions", condition),
            str_req("approved_by"),
            str_req("remarks"),
            str_req("created_by"),
        ]),
    )
}

fn credit_debit_notes() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "credit-debit-notes",
        "credit_debit_notes",
        "note_id",
        IdStrategy::prefixed("CDN"),
        Schema::new(vec![
            str_req("note_number"),
            str_req("invoice_id"),
            str_req("customer_gstin"),
            enumerated("note_type", &["Credit", "Debit"]),
            str_req("reason"),
            num0("taxable_amount"),
            num0("cgst_amount"),
            num0("sgst_amount"),
            num0("igst_amount"),
            num0("total_amount"),
            enumerated("status", &["Draft", "Posted", "Cancelled"]),
            str_req("created_by"),
        ]),
    )
}

fn customer_master() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "customer-master",
        "customer_master",
        "customer_id",
        IdStrategy::prefixed("CUST"),
        Schema::new(vec![
            str_req("customer_name"),
            str_req("contact_person"),
            str_req("email").with_pattern(EMAIL_PATTERN),
            str_req("phone"),
            str_req("address"),
            str_req("city"),
            str_req("state"),
            str_req("country"),
            str_req("pincode"),
            str_req("gst_number"),
            num("credit_limit"),
            str_req("payment_terms"),
            enumerated("status", &["Active", "Inactive", "Blocked"]),
        ]),
    )
    .filters(&["status", "city", "state"])
    .authenticated()
}

fn dispatch_status_reports() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "dispatch-status-reports",
        "dispatch_status_reports",
        "report_id",
        IdStrategy::prefixed("DSR-"),
        Schema::new(vec![
            str_req("drn_id"),
            date("report_date"),
            str_req("current_location"),
            enum_def(
                "current_status",
                &["In Transit", "Delivered", "At Hub", "Out for Delivery"],
                "In Transit",
            ),
            date("estimated_delivery_date"),
            str_opt("delay_reason"),
            str_opt("remarks"),
            str_req("created_by"),
        ]),
    )
    .authenticated()
}

fn e_invoices() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "e-invoices",
        "e_invoices",
        "invoice_id",
        IdStrategy::prefixed("INV-"),
        Schema::new(vec![
            date("invoice_date"),
            str_req("invoice_number"),
            str_req("customer_gstin"),
            str_req("hsn_code"),
            num("taxable_amount"),
            num("cgst_amount"),
            num("sgst_amount"),
            num("igst_amount"),
            num("total_amount"),
            str_req("irn"),
            str_req("qr_code"),
            enum_def("status", &["Draft", "Generated", "Cancelled", "Amended"], "Draft"),
        ]),
    )
    .unique(&["invoice_number", "irn"])
    .lookup_also_by("invoice_number")
    .stamped_creator()
    .merge_updates()
}

fn e_way_bills() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "e-way-bills",
        "e_way_bills",
        "eway_bill_id",
        IdStrategy::prefixed("EWB"),
        Schema::new(vec![
            date("bill_date"),
            str_req("bill_number"),
            str_req("invoice_id"),
            str_req("from_gstin"),
            str_req("to_gstin"),
            str_req("transport_mode"),
            str_req("vehicle_number"),
            num("distance_km"),
            num("value"),
            enumerated("status", &["Active", "Cancelled", "Expired"]),
            str_req("created_by"),
        ]),
    )
    .filters(&["status", "from_gstin", "to_gstin"])
    .authenticated()
}

fn employee_attendance() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "employee-attendance",
        "employee_attendance",
        "attendance_id",
        IdStrategy::prefixed("ATT"),
        Schema::new(vec![
            str_req("employee_id"),
            date("date"),
            date("check_in"),
            date("check_out"),
            enumerated("status", &["Present", "Absent", "Late", "Half Day"]),
            str_opt("remarks"),
        ]),
    )
    .filters(&["status", "employee_id", "date"])
    .authenticated()
}

fn employee_records() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "employee-records",
        "employee_records",
        "employee_id",
        IdStrategy::prefixed("EMP"),
        Schema::new(vec![
            str_req("first_name"),
            str_req("last_name"),
            str_req("email").with_pattern(EMAIL_PATTERN),
            str_req("phone"),
            date("date_of_birth"),
            enumerated("gender", &["Male", "Female", "Other"]),
            str_req("address"),
            str_req("department"),
            str_req("designation"),
            date("join_date"),
            enumerated("employment_type", &["Permanent", "Temporary", "Contract"]),
            enumerated("status", &["Active", "Inactive", "Terminated"]),
        ]),
    )
    .filters(&["department", "status", "employment_type"])
    .authenticated()
}

fn faqs() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "faqs",
        "faqs",
        "id",
        IdStrategy::prefixed("FAQ"),
        Schema::new(vec![
            str_req("question"),
            str_req("answer"),
            str_req("category"),
            str_req("erp_module"),
            str_opt("gst_type"),
            str_req("transaction_type"),
            str_req("user_role"),
        ]),
    )
}

fn goods_issue_notes() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "goods-issue-notes",
        "goods_issue_notes",
        "gin_id",
        IdStrategy::prefixed("GIN"),
        Schema::new(vec![
            date("issue_date"),
            str_req("requisition_number"),
            str_req("department"),
            enumerated(
                "purpose",
                &["Production", "Testing", "Maintenance", "Research", "Other"],
            ),
            num0("total_quantity"),
            num0("total_value"),
            enumerated(
                "status",
                &["Draft", "Pending", "Approved", "Rejected", "Cancelled"],
            ),
            str_opt("remarks"),
            str_req("created_by"),
        ]),
    )
}

fn gst_audit_reports() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "gst-audit-reports",
        "gst_audit_reports",
        "report_id",
        IdStrategy::prefixed("GSTR-"),
        Schema::new(vec![
            enumerated("report_type", &["GSTR-9", "GSTR-9C"]),
            str_req("financial_year"),
            date("generation_date"),
            num("total_turnover"),
            num("total_tax_paid"),
            num("total_input_tax_credit"),
            enumerated("audit_status", &["Draft", "Filed", "Final"]),
            str_req("auditor_name"),
        ]),
    )
    .stamped_creator()
}

fn gst_configurations() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "gst-configurations",
        "gst_configurations",
        "config_id",
        IdStrategy::prefixed("GSTC-"),
        Schema::new(vec![
            str_req("gstin"),
            str_req("business_name"),
            str_req("business_address"),
            str_req("state_code"),
            enumerated(
                "tax_payer_type",
                &["Regular", "Composition", "ISD", "TDS", "TCS"],
            ),
            date("registration_date"),
            num("default_tax_rate"),
            enumerated("filing_frequency", &["Monthly", "Quarterly", "Annually"]),
            bool_def("auto_generate_einvoice", false),
            bool_def("auto_generate_eway", false),
            enum_def("status", &["Active", "Inactive"], "Active"),
        ]),
    )
    .stamped_creator()
}

fn gst_reconciliation() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "gst-reconciliation",
        "gst_reconciliation",
        "reconciliation_id",
        IdStrategy::prefixed("REC-"),
        Schema::new(vec![
            str_req("period"),
            num("gstr1_total"),
            num("gstr2a_total"),
            num("gstr3b_total"),
            num("discrepancy_amount"),
            enumerated(
                "reconciliation_status",
                &["Pending", "In Progress", "Completed", "Discrepancy Found"],
            ),
            str_opt("remarks"),
        ]),
    )
    .stamped_creator()
}

fn gst_returns() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "gst-returns",
        "gst_returns",
        "return_id",
        IdStrategy::prefixed("GSTR-"),
        Schema::new(vec![
            enumerated("return_type", &["GSTR-1", "GSTR-2A", "GSTR-3B", "GSTR-9"]),
            str_req("filing_period"),
            date("due_date"),
            date("filing_date"),
            num("total_tax_liability"),
            num("total_input_tax"),
            num("tax_payable"),
            enumerated("status", &["Draft", "Pending", "Filed", "Error"]),
            str_opt("remarks"),
        ]),
    )
    .stamped_creator()
}

fn gstin_records() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "gstin-records",
        "gstin_records",
        "record_id",
        IdStrategy::prefixed("GSTIN-"),
        Schema::new(vec![
            str_req("gstin").with_pattern(GSTIN_PATTERN),
            str_req("legal_name"),
            str_req("trade_name"),
            str_req("address"),
            str_req("state_code").with_pattern(STATE_CODE_PATTERN),
            enumerated(
                "registration_type",
                &[
                    "Regular",
                    "Composition",
                    "Unregistered",
                    "Input Service Distributor",
                ],
            ),
            date("registration_date"),
            enumerated("status", &["Active", "Inactive", "Suspended", "Cancelled"]),
            str_opt("remarks"),
        ]),
    )
    .stamped_creator()
}

fn gstr2a() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "gstr2a",
        "gstr2a",
        "record_id",
        IdStrategy::prefixed("GSTR2A-"),
        Schema::new(vec![
            str_req("gstin"),
            str_req("trade_name"),
            str_req("filing_period"),
            str_req("invoice_number"),
            str_req("invoice_type"),
            date("invoice_date"),
            num("invoice_value"),
            str_req("place_of_supply"),
            str_req("supply_type"),
            num("taxable_value"),
            num("igst"),
            num("cgst"),
            num("sgst"),
            num("total_tax"),
            enum_def(
                "status",
                &["Pending", "Matched", "Partially Matched", "Not Matched"],
                "Pending",
            ),
        ]),
    )
    .stamped_creator()
}

fn hsn_codes() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "hsn-codes",
        "hsn_codes",
        "hsn_id",
        IdStrategy::Uuid,
        Schema::new(vec![
            str_req("hsn_code"),
            str_req("description"),
            num0("gst_rate"),
            num0("cgst_rate"),
            num0("sgst_rate"),
            num0("igst_rate"),
            bool_def("is_active", true),
        ]),
    )
}

fn inventory_zones() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "inventory-zones",
        "inventory_zones",
        "zone_id",
        IdStrategy::Uuid,
        Schema::new(vec![
            str_req("zone_name"),
            str_req("location_code"),
            str_req("description"),
            num0("capacity"),
            num0("current_occupancy"),
            boolean("temperature_controlled"),
            str_opt("temperature_range"),
            enumerated("status", &["Available", "Full", "Maintenance", "Reserved"]),
        ]),
    )
}

fn invoices() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "invoices",
        "invoices",
        "invoice_id",
        IdStrategy::prefixed("INV"),
        Schema::new(vec![
            str_req("order_id"),
            str_req("customer_id"),
            date("invoice_date"),
            date("due_date"),
            enumerated("payment_status", &["Pending", "Completed", "Cancelled"]),
            num("total_amount"),
            num("tax_amount"),
            num("shipping_amount"),
            num("grand_total"),
            str_req("eway_bill_number"),
            str_req("created_by"),
        ]),
    )
    .filters(&["payment_status", "customer_id", "order_id"])
    .authenticated()
}

fn job_cards() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "job-cards",
        "job_cards",
        "job_card_id",
        IdStrategy::prefixed("JC"),
        Schema::new(vec![
            str_req("work_order_id"),
            str_req("operator_id"),
            str_req("machine_id"),
            date("start_time"),
            date("end_time"),
            num("planned_quantity"),
            num("actual_quantity"),
            num("rejected_quantity"),
            enumerated("status", &["Active", "Completed", "Paused", "Cancelled"]),
            enumerated("quality_status", &["Pending", "Approved", "Rejected"]),
            str_opt("remarks"),
            str_req("created_by"),
        ]),
    )
    .filters(&["status", "quality_status", "work_order_id"])
    .authenticated()
}

fn journal_entries() -> ResourceDescriptor {
    let line = Schema::new(vec![
        str_req("account_id"),
        num0("debit_amount"),
        num0("credit_amount"),
        str_req("description"),
    ]);
    ResourceDescriptor::new(
        "journal-entries",
        "journal_entries",
        "entry_id",
        IdStrategy::prefixed("JRN"),
        Schema::new(vec![
            date("entry_date"),
            str_req("reference"),
            str_req("description"),
            array_of("entries", line),
            num0("total_debit"),
            num0("total_credit"),
            enumerated("status", &["Draft", "Posted", "Cancelled"]),
            str_req("created_by"),
        ]),
    )
}

fn leave_management() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "leave-management",
        "leave_management",
        "leave_id",
        IdStrategy::prefixed("LEV"),
        Schema::new(vec![
            str_req("employee_id"),
            str_req("leave_type"),
            date("start_date"),
            date("end_date"),
            str_req("reason"),
            enum_def("status", &["Pending", "Approved", "Rejected"], "Pending"),
            str_opt("approved_by"),
        ]),
    )
    .filters(&["status", "employee_id"])
    .authenticated()
}

fn material_revalidation() -> ResourceDescriptor {
    let test_result = Schema::new(vec![
        str_req("parameter_id"),
        num("measured_value"),
        enumerated("status", &["Pass", "Fail"]),
        str_req("remarks"),
    ]);
    ResourceDescriptor::new(
        "material-revalidation",
        "material_revalidation",
        "revalidation_id",
        IdStrategy::prefixed("REV"),
        Schema::new(vec![
            str_req("material_code"),
            str_req("batch_number"),
            date("revalidation_date"),
            str_req("reason"),
            array_of("test_results", test_result),
            enumerated("overall_status", &["Pass", "Fail", "Conditional Pass"]),
            date("valid_until"),
            str_req("approved_by"),
            str_req("remarks"),
        ]),
    )
}

fn payment_processing() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "payment-processing",
        "payment_processing",
        "payment_id",
        IdStrategy::prefixed("PAY-"),
        Schema::new(vec![
            str_req("reference_id"),
            date("payment_date"),
            num("amount"),
            str_req("payment_mode"),
            str_req("payment_type"),
            str_req("account_id"),
            enum_def(
                "status",
                &["Pending", "Completed", "Failed", "Cancelled"],
                "Pending",
            ),
            str_opt("remarks"),
            str_req("created_by"),
        ]),
    )
    .authenticated()
}

fn payroll_reports() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "payroll-reports",
        "payroll_reports",
        "report_id",
        IdStrategy::prefixed("PAY-"),
        Schema::new(vec![
            str_req("employee_id"),
            str_req("employee_name"),
            str_req("pay_period"),
            num("basic_salary"),
            num("allowances"),
            num("deductions"),
            num("net_salary"),
            enum_def("payment_status", &["Pending", "Processed", "Paid"], "Pending"),
            date_opt("payment_date"),
            str_opt("remarks"),
        ]),
    )
    .stamped_creator()
}

fn pdir_entries() -> ResourceDescriptor {
    let result = Schema::new(vec![
        str_req("checkpoint_id"),
        num("measured_value"),
        enumerated("status", &["Pass", "Fail", "Marginal"]),
        str_req("remarks"),
    ]);
    ResourceDescriptor::new(
        "pdir-entries",
        "pdir_entries",
        "pdir_id",
        IdStrategy::prefixed("PDIR"),
        Schema::new(vec![
            str_req("product_code"),
            str_req("batch_number"),
            date("inspection_date"),
            str_req("checklist_id"),
            str_req("specification_id"),
            str_req("inspector_id"),
            array_of("results", result),
            enumerated("overall_status", &["Passed", "Failed", "Pending"]),
            str_req("remarks"),
            str_req("created_by"),
        ]),
    )
}

fn process_definitions() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "process-definitions",
        "process_definitions",
        "process_id",
        IdStrategy::prefixed("PROC-"),
        Schema::new(vec![
            str_req("process_code"),
            str_req("process_name"),
            str_req("description"),
            num("standard_time_minutes"),
            num("setup_time_minutes"),
            num("cleanup_time_minutes"),
            string_array("required_skills"),
            string_array("required_tools"),
            num("quality_checkpoints"),
            num_opt("temperature_requirements"),
            enum_def("status", &["Active", "Inactive"], "Active"),
        ]),
    )
    .unique(&["process_code"])
    .lookup_also_by("process_code")
    .stamped_creator()
}

fn production_inventory() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "production-inventory",
        "production_inventory",
        "inventory_id",
        IdStrategy::prefixed("INV-"),
        Schema::new(vec![
            str_req("item_code"),
            str_req("item_name"),
            str_req("batch_number"),
            num("quantity"),
            str_req("unit"),
            enum_def(
                "status",
                &["In Production", "Completed", "On Hold", "Scrapped"],
                "In Production",
            ),
            str_req("location"),
            date_opt("expiry_date"),
            str_opt("remarks"),
        ]),
    )
    .stamped_creator()
}

fn raw_material_master() -> ResourceDescriptor {
    let quality_parameters = Schema::new(vec![
        str_opt("parameter1"),
        str_opt("parameter2"),
        str_opt("parameter3"),
    ]);
    ResourceDescriptor::new(
        "raw-material-master",
        "raw_material_master",
        "material_id",
        IdStrategy::Uuid,
        Schema::new(vec![
            str_req("material_code"),
            str_req("material_name"),
            str_req("category"),
            str_req("description"),
            enumerated("unit_of_measure", UNITS_OF_MEASURE),
            num0("standard_cost"),
            num0("minimum_stock"),
            num0("maximum_stock"),
            num0("current_stock"),
            num0("shelf_life_days"),
            str_req("storage_requirements"),
            FieldSpec::required("quality_parameters", FieldType::Object(quality_parameters)),
            enumerated(
                "status",
                &["Active", "Inactive", "Under Review", "Discontinued"],
            ),
        ]),
    )
    .unique(&["material_code"])
    .lookup_also_by("material_code")
}

fn sales_orders() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "sales-orders",
        "sales_orders",
        "order_id",
        IdStrategy::prefixed("SO"),
        Schema::new(vec![
            str_req("customer_id"),
            date("order_date"),
            date("delivery_date"),
            enumerated(
                "order_status",
                &["Pending", "Confirmed", "Shipped", "Delivered", "Cancelled"],
            ),
            enumerated("payment_status", &["Pending", "Completed", "Failed"]),
            num("total_amount"),
            num("tax_amount"),
            num("shipping_amount"),
            num("grand_total"),
            str_req("created_by"),
        ]),
    )
    .filters(&["order_status", "payment_status", "customer_id"])
    .authenticated()
}

fn sales_register() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "sales-register",
        "sales_register",
        "sale_id",
        IdStrategy::prefixed("SALE"),
        Schema::new(vec![
            str_req("order_id"),
            str_req("customer_id"),
            date("sale_date"),
            str_req("product_code"),
            num("quantity"),
            num("unit_price"),
            num("total_amount"),
            num("tax_amount"),
            num("shipping_amount"),
            num("grand_total"),
            enumerated("payment_status", &["Pending", "Completed", "Failed"]),
            str_req("payment_terms"),
            str_req("created_by"),
        ]),
    )
    .filters(&["payment_status", "customer_id", "order_id"])
    .authenticated()
}

fn sku_master() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "sku-master",
        "sku_master",
        "sku_id",
        IdStrategy::prefixed("SKU-"),
        Schema::new(vec![
            str_req("product_name"),
            str_req("category"),
            num("unit_price"),
            num("unit_cost"),
            num("stock_quantity"),
            str_req("manufacturer"),
            str_req("description"),
            str_req("hsn_code"),
            num("gst_percentage"),
            enum_def("status", &["Active", "Inactive"], "Active"),
        ]),
    )
    .stamped_creator()
}

fn standard_specifications() -> ResourceDescriptor {
    let parameter = Schema::new(vec![
        str_req("parameter_id"),
        str_req("parameter_name"),
        str_req("unit"),
        num("min_value"),
        num("max_value"),
        num("target_value"),
    ]);
    ResourceDescriptor::new(
        "standard-specifications",
        "standard_specifications",
        "specification_id",
        IdStrategy::prefixed("SPEC-"),
        Schema::new(vec![
            str_req("specification_code"),
            str_req("specification_name"),
            str_req("category"),
            str_req("description"),
            array_of("parameters", parameter),
            enum_def("status", &["Active", "Inactive"], "Active"),
        ]),
    )
    .unique(&["specification_code"])
    .lookup_also_by("specification_code")
    .stamped_creator()
}

fn stock_aging() -> ResourceDescriptor {
    let age_brackets = Schema::new(vec![
        num0("0-30_days"),
        num0("31-60_days"),
        num0("61-90_days"),
        num0("90_plus_days"),
    ]);
    ResourceDescriptor::new(
        "stock-aging",
        "stock_aging",
        "aging_id",
        IdStrategy::Uuid,
        Schema::new(vec![
            str_req("item_id"),
            date("aging_date"),
            num0("current_stock"),
            num0("stock_value"),
            FieldSpec::required("age_brackets", FieldType::Object(age_brackets)),
            date("last_movement_date"),
        ]),
    )
    .sort_by("aging_date", SortDirection::Descending)
}

fn stock_categories() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "stock-categories",
        "stock_categories",
        "category_id",
        IdStrategy::prefixed("CAT-"),
        Schema::new(vec![
            str_req("category_name"),
            str_req("sub_category"),
            str_req("description"),
            str_req("unit_of_measure"),
            num("reorder_level"),
            num("maximum_level"),
            num("shelf_life_days"),
            str_req("storage_requirements"),
            enum_def("status", &["Active", "Inactive"], "Active"),
        ]),
    )
    .stamped_creator()
}

fn stock_items() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "stock-items",
        "stock_items",
        "item_id",
        IdStrategy::Uuid,
        Schema::new(vec![
            str_req("item_code"),
            str_req("item_name"),
            str_req("category_id"),
            str_req("description"),
            enumerated("unit_of_measure", UNITS_OF_MEASURE),
            num0("current_stock"),
            num0("reorder_level"),
            num0("maximum_level"),
            num0("average_consumption"),
            date("last_received_date"),
            date("last_issued_date"),
            enumerated(
                "status",
                &["In Stock", "Out of Stock", "Low Stock", "Discontinued"],
            ),
        ]),
    )
    .unique(&["item_code"])
    .lookup_also_by("item_code")
}

fn tax_codes() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "tax-codes",
        "tax_codes",
        "code_id",
        IdStrategy::prefixed("TAX-"),
        Schema::new(vec![
            str_req("tax_code"),
            str_req("tax_name"),
            num("rate"),
            str_req("description"),
            bool_def("is_active", true),
        ]),
    )
    .unique(&["tax_code"])
    .lookup_also_by("tax_code")
    .stamped_creator()
}

fn work_orders() -> ResourceDescriptor {
    ResourceDescriptor::new(
        "work-orders",
        "work_orders",
        "work_order_id",
        IdStrategy::prefixed("WO"),
        Schema::new(vec![
            str_req("batch_id"),
            str_req("process_id"),
            date("order_date"),
            date("planned_start_date"),
            date("planned_end_date"),
            date_opt("actual_start_date"),
            date_opt("actual_end_date"),
            num0("planned_quantity"),
            num_opt("actual_quantity"),
            enumerated(
                "status",
                &["Pending", "In Progress", "Completed", "Cancelled"],
            ),
            enumerated("priority", &["Low", "Medium", "High", "Critical"]),
            str_opt("remarks"),
            str_req("created_by"),
        ]),
    )
    .filters(&["status", "priority", "batch_id"])
    .authenticated()
}

#[cfg(test)]
mod tests {
    use super::catalog;
    use crate::descriptor::Registry;

    #[test]
    fn catalog_passes_registry_validation() {
        let registry = Registry::new(catalog()).unwrap();
        assert_eq!(registry.len(), 39);
    }

    #[test]
    fn dual_key_resources_declare_unique_alternates() {
        let with_alternates: Vec<String> = catalog()
            .into_iter()
            .filter(|d| d.alternate_lookup.is_some())
            .map(|d| d.path)
            .collect();
        assert!(with_alternates.len() >= 5, "{:?}", with_alternates);
    }
}
