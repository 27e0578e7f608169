//! Report rendering for a [`PayrollAnalysis`].
//!
//! The text report walks through the analysis step by step, in a fixed
//! section order, so two runs with the same inputs produce identical output.

use std::io::{self, Write};

use rust_decimal::Decimal;

use payroll_core::RateTable;
use payroll_core::calculations::PayrollAnalysis;

use crate::format::{format_currency, format_percent, format_rate, format_share};

const RULE: &str =
    "================================================================================";

// ─── text report ─────────────────────────────────────────────────────────────

/// Plain-text walkthrough of an analysis.
///
/// The rate table must be the one the analysis ran against; it supplies the
/// rates quoted next to each amount.
#[derive(Debug, Clone, Copy)]
pub struct TextReport<'a> {
    analysis: &'a PayrollAnalysis,
    table: &'a RateTable,
}

impl<'a> TextReport<'a> {
    pub fn new(
        analysis: &'a PayrollAnalysis,
        table: &'a RateTable,
    ) -> Self {
        Self { analysis, table }
    }

    /// Writes every section of the report to `out`.
    pub fn render<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        self.header(out)?;
        self.scenario(out)?;
        self.solver_step(out)?;
        self.components_step(out)?;
        self.bonus_step(out)?;
        self.summary_step(out)?;
        self.bonus_breakdown(out)?;
        self.footer(out)
    }

    fn header<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "PAYROLL GROSS-UP ANALYSIS")?;
        writeln!(
            out,
            "Rate table valid {} to {}",
            self.table.valid_from, self.table.valid_until
        )?;
        writeln!(out, "{RULE}")?;
        writeln!(out)
    }

    fn scenario<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        let request = &self.analysis.request;
        writeln!(out, "SCENARIO:")?;
        writeln!(
            out,
            "  Desired net salary: {}",
            format_currency(request.desired_net)
        )?;
        writeln!(out, "  Dependents: {}", request.dependents)?;
        writeln!(out)
    }

    fn solver_step<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        let a = self.analysis;
        section(out, "STEP 1: REQUIRED GROSS SALARY")?;

        writeln!(out, "Result after {} iterations:", a.iterations)?;
        writeln!(out, "  Required gross salary: {}", format_currency(a.gross))?;
        writeln!(out, "  Achieved net salary: {}", format_currency(a.net))?;
        writeln!(
            out,
            "  Difference: {}",
            format_currency(a.net_difference.abs())
        )?;
        if !a.converged {
            writeln!(
                out,
                "  WARNING: the solver did not converge; amounts below use its last estimate."
            )?;
        }
        writeln!(out)
    }

    fn components_step<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        let a = self.analysis;
        let rates = &self.table.employer_charges;
        let charges = &a.employer_charges;
        section(out, "STEP 2: PAYROLL COMPONENTS")?;
        writeln!(out)?;

        writeln!(out, "2.1 EMPLOYEE CONTRIBUTION (progressive brackets):")?;
        writeln!(out, "    Gross salary: {}", format_currency(a.gross))?;
        for slice in &a.employee_contribution.slices {
            writeln!(
                out,
                "    Bracket {}: {} x {} = {}",
                slice.number,
                format_currency(slice.base),
                format_rate(slice.rate, 1),
                format_currency(slice.amount)
            )?;
        }
        writeln!(
            out,
            "    Total employee contribution: {}",
            format_currency(a.employee_contribution.total)
        )?;
        writeln!(out)?;

        writeln!(out, "2.2 WITHHOLDING:")?;
        if a.request.dependents > 0 {
            writeln!(
                out,
                "    Base = {} - {} - {} x {}",
                format_currency(a.gross),
                format_currency(a.employee_contribution.total),
                a.request.dependents,
                format_currency(self.table.dependent_allowance)
            )?;
        }
        writeln!(
            out,
            "    Withholding base = {}",
            format_currency(a.withholding_base)
        )?;
        writeln!(
            out,
            "    Withholding = base x {} = {}",
            format_rate(self.table.withholding_rate, 2),
            format_currency(a.withholding)
        )?;
        writeln!(out)?;

        writeln!(out, "2.3 NET CHECK:")?;
        writeln!(
            out,
            "    Net = {} - {} - {}",
            format_currency(a.gross),
            format_currency(a.employee_contribution.total),
            format_currency(a.withholding)
        )?;
        writeln!(out, "    Net = {}", format_currency(a.net))?;
        writeln!(out)?;

        writeln!(
            out,
            "2.4 EMPLOYER SOCIAL SECURITY ({}): {}",
            format_rate(rates.social_security, 2),
            format_currency(charges.social_security)
        )?;
        writeln!(
            out,
            "2.5 ACCIDENT INSURANCE ({}): {}",
            format_rate(rates.accident_insurance, 2),
            format_currency(charges.accident_insurance)
        )?;
        writeln!(
            out,
            "2.6 SEVERANCE FUND DEPOSIT ({}): {}",
            format_rate(rates.severance_deposit, 2),
            format_currency(charges.severance_deposit)
        )?;
        writeln!(
            out,
            "2.7 SEVERANCE FUND PENALTY ({}): {}",
            format_rate(rates.severance_penalty, 2),
            format_currency(charges.severance_penalty)
        )?;
        writeln!(
            out,
            "2.8 SEVERANCE FUND TOTAL ({}): {}",
            format_rate(rates.severance_deposit + rates.severance_penalty, 2),
            format_currency(charges.severance_total())
        )?;
        writeln!(out)?;

        let p = &self.table.provisions;
        let provisions = &a.provisions;
        writeln!(out, "2.9 PROVISIONS:")?;
        writeln!(
            out,
            "    Formula: (gross/{m} + gross/{d}/{m} + gross/{m}) x {x}",
            m = p.months_per_year.normalize(),
            d = p.vacation_bonus_divisor.normalize(),
            x = p.multiplier.normalize()
        )?;
        writeln!(
            out,
            "    Thirteenth salary: {}",
            format_currency(provisions.thirteenth_salary)
        )?;
        writeln!(
            out,
            "    Vacation bonus: {}",
            format_currency(provisions.vacation_bonus)
        )?;
        writeln!(out, "    Vacation: {}", format_currency(provisions.vacation))?;
        writeln!(out, "    Base total: {}", format_currency(provisions.base_total))?;
        writeln!(
            out,
            "    Provisions = {} x {} = {}",
            format_currency(provisions.base_total),
            p.multiplier.normalize(),
            format_currency(provisions.total)
        )?;
        writeln!(
            out,
            "    Share of gross: {}",
            format_percent(a.percentages.provisions)
        )?;
        writeln!(out)
    }

    fn bonus_step<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        let bonus = &self.analysis.bonus;
        let shares = &self.table.bonus;
        section(out, "STEP 3: BONUS")?;
        writeln!(out)?;

        writeln!(out, "BONUS RULE:")?;
        writeln!(
            out,
            "  - Severance fund total -> {} of the amount",
            format_share(shares.severance_share)
        )?;
        writeln!(
            out,
            "  - (employer social security + accident insurance + employee contribution \
             + withholding + provisions) -> {} of the amount",
            format_share(shares.other_charges_share)
        )?;
        writeln!(out)?;

        writeln!(
            out,
            "Component 1: severance fund total x {} = {}",
            format_share(shares.severance_share),
            format_currency(bonus.severance_component)
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "Component 2: other charges x {}",
            format_share(shares.other_charges_share)
        )?;
        writeln!(out, "  Sum = {}", format_currency(bonus.other_charges))?;
        writeln!(
            out,
            "  Bonus = {}",
            format_currency(bonus.other_charges_component)
        )?;
        writeln!(out)?;

        writeln!(
            out,
            "TOTAL BONUS: {} ({} of gross)",
            format_currency(bonus.total),
            format_percent(bonus.percent_of_gross)
        )?;
        writeln!(out)
    }

    fn summary_step<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        let a = self.analysis;
        let pct = &a.percentages;
        let rates = &self.table.employer_charges;
        let charges = &a.employer_charges;
        let shares = &self.table.bonus;
        section(out, "STEP 4: SUMMARY")?;
        writeln!(out)?;

        writeln!(out, "SALARY:")?;
        writeln!(out, "  Gross: {}", format_currency(a.gross))?;
        amount_line(
            out,
            "Employee contribution",
            a.employee_contribution.total,
            pct.employee_contribution,
        )?;
        amount_line(out, "Withholding", a.withholding, pct.withholding)?;
        amount_line(out, "Net", a.net, pct.net)?;
        writeln!(out)?;

        writeln!(out, "EMPLOYER CHARGES:")?;
        rate_line(
            out,
            "Social security",
            charges.social_security,
            rates.social_security,
        )?;
        rate_line(
            out,
            "Accident insurance",
            charges.accident_insurance,
            rates.accident_insurance,
        )?;
        rate_line(
            out,
            "Severance deposit",
            charges.severance_deposit,
            rates.severance_deposit,
        )?;
        rate_line(
            out,
            "Severance penalty",
            charges.severance_penalty,
            rates.severance_penalty,
        )?;
        amount_line(out, "Provisions", a.provisions.total, pct.provisions)?;
        amount_line(
            out,
            "Total",
            a.employer_total_charges,
            pct.employer_total_charges,
        )?;
        writeln!(out)?;

        writeln!(out, "BONUS:")?;
        writeln!(
            out,
            "  Severance fund ({}): {}",
            format_share(shares.severance_share),
            format_currency(a.bonus.severance_component)
        )?;
        writeln!(
            out,
            "  Other charges ({}): {}",
            format_share(shares.other_charges_share),
            format_currency(a.bonus.other_charges_component)
        )?;
        amount_line(out, "Total", a.bonus.total, a.bonus.percent_of_gross)?;
        writeln!(out)?;

        writeln!(out, "EMPLOYER TOTAL COST:")?;
        writeln!(out, "  = Gross + Charges - Bonus")?;
        writeln!(
            out,
            "  = {} + {} - {}",
            format_currency(a.gross),
            format_currency(a.employer_total_charges),
            format_currency(a.bonus.total)
        )?;
        writeln!(out, "  = {}", format_currency(a.employer_total_cost))?;
        writeln!(out)?;
        writeln!(
            out,
            "MONTHLY PAYMENT SLIP TOTAL: {}",
            format_currency(a.guide_total)
        )?;
        writeln!(out)
    }

    fn bonus_breakdown<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        let a = self.analysis;
        let charges = &a.employer_charges;
        let shares = &self.table.bonus;
        section(out, "DETAILED BONUS BREAKDOWN")?;
        writeln!(out)?;

        writeln!(
            out,
            "Component 1 - Severance fund total ({}):",
            format_share(shares.severance_share)
        )?;
        share_line(
            out,
            "Severance deposit",
            charges.severance_deposit,
            shares.severance_share,
        )?;
        share_line(
            out,
            "Severance penalty",
            charges.severance_penalty,
            shares.severance_share,
        )?;
        writeln!(
            out,
            "  Subtotal: {}",
            format_currency(a.bonus.severance_component)
        )?;
        writeln!(out)?;

        let share = shares.other_charges_share;
        writeln!(
            out,
            "Component 2 - Other charges ({}):",
            format_share(share)
        )?;
        share_line(out, "Employer social security", charges.social_security, share)?;
        share_line(out, "Accident insurance", charges.accident_insurance, share)?;
        share_line(
            out,
            "Employee contribution",
            a.employee_contribution.total,
            share,
        )?;
        share_line(out, "Withholding", a.withholding, share)?;
        share_line(out, "Provisions", a.provisions.total, share)?;
        writeln!(
            out,
            "  Subtotal: {}",
            format_currency(a.bonus.other_charges_component)
        )?;
        writeln!(out)?;

        writeln!(out, "TOTAL BONUS: {}", format_currency(a.bonus.total))?;
        writeln!(out)
    }

    fn footer<W: Write>(
        &self,
        out: &mut W,
    ) -> io::Result<()> {
        writeln!(out, "{RULE}")?;
        writeln!(out, "END OF ANALYSIS")?;
        writeln!(out, "{RULE}")
    }
}

// ─── line helpers ────────────────────────────────────────────────────────────

fn section<W: Write>(
    out: &mut W,
    title: &str,
) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{RULE}")
}

/// `  Label: R$ x (p%)` where `percent` is already a percentage.
fn amount_line<W: Write>(
    out: &mut W,
    label: &str,
    amount: Decimal,
    percent: Decimal,
) -> io::Result<()> {
    writeln!(
        out,
        "  {label}: {} ({})",
        format_currency(amount),
        format_percent(percent)
    )
}

/// `  Label: R$ x (r%)` where `rate` is a fraction.
fn rate_line<W: Write>(
    out: &mut W,
    label: &str,
    amount: Decimal,
    rate: Decimal,
) -> io::Result<()> {
    writeln!(
        out,
        "  {label}: {} ({})",
        format_currency(amount),
        format_rate(rate, 2)
    )
}

fn share_line<W: Write>(
    out: &mut W,
    label: &str,
    amount: Decimal,
    share: Decimal,
) -> io::Result<()> {
    writeln!(
        out,
        "  {label}: {} -> Bonus: {}",
        format_currency(amount),
        format_currency(amount * share)
    )
}

// ─── json report ─────────────────────────────────────────────────────────────

/// Writes the analysis as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(
    analysis: &PayrollAnalysis,
    out: &mut W,
) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, analysis)?;
    writeln!(out)
}
