//! End-to-end tests: parse a whole program and run it through the
//! evaluator's library entry point, asserting on captured `PRINT` output.
//! These mirror the canonical programs from the design doc's testable
//! properties section.

use cinterp::error::Error;
use cinterp::eval;
use cinterp::front::parse;
use pretty_assertions::assert_eq;

fn run(src: &str, stdin: &str) -> String {
    let program = parse(src).expect("program should parse");
    let mut out = Vec::new();
    eval::run(&program, stdin.as_bytes(), &mut out).expect("program should evaluate");
    String::from_utf8(out).expect("output should be utf8")
}

#[test]
fn sum_of_two_locals() {
    assert_eq!(run("int main(){int a=5;int b=3;PRINT(a+b);}", ""), "8");
}

#[test]
fn for_loop_accumulator() {
    assert_eq!(
        run("int main(){int i;int s=0;for(i=0;i<4;i=i+1){s=s+i;}PRINT(s);}", ""),
        "6"
    );
}

#[test]
fn malloc_pointer_arithmetic_free() {
    let src = "int main(){int*a;a=(int*)MALLOC(sizeof(int)*2);*a=10;*(a+1)=20;\
               PRINT(*a);PRINT(*(a+1));FREE(a);}";
    assert_eq!(run(src, ""), "1020");
}

#[test]
fn swap_via_pointer_parameters() {
    let src = "void swap(int*x,int*y){int t;t=*x;*x=*y;*y=t;} \
               int main(){int*a;int*b;a=(int*)MALLOC(sizeof(int));b=(int*)MALLOC(sizeof(int));\
               *a=42;*b=24;swap(a,b);PRINT(*a);PRINT(*b);FREE(a);FREE(b);return 0;}";
    assert_eq!(run(src, ""), "2442");
}

#[test]
fn get_from_stdin_drives_branch() {
    let src = "int main(){int n;n=GET();if(n>0)PRINT(1);else PRINT(0);}";
    assert_eq!(run(src, "7\n"), "1");
    assert_eq!(run(src, "0\n"), "0");
}

#[test]
fn global_initializer_visible_in_main() {
    assert_eq!(run("int g=5;int main(){PRINT(g);}", ""), "5");
}

#[test]
fn pointer_to_pointer_chain() {
    let src = "int main(){int*a;int**pp;a=(int*)MALLOC(sizeof(int));*a=7;\
               pp=(int**)MALLOC(sizeof(int*));*pp=a;PRINT(**pp);FREE(a);FREE(pp);}";
    assert_eq!(run(src, ""), "7");
}

#[test]
fn array_of_pointers_each_written_independently() {
    let src = "int f(int*p){return *p+1;} \
               int main(){int x;int y;int*arr[2];int*px;int*py;\
               x=1;y=2;px=(int*)MALLOC(sizeof(int));py=(int*)MALLOC(sizeof(int));\
               *px=x;*py=y;arr[0]=px;arr[1]=py;PRINT(f(arr[0]));PRINT(f(arr[1]));\
               FREE(px);FREE(py);}";
    assert_eq!(run(src, ""), "23");
}

#[test]
fn recursion_through_resolved_direct_callee() {
    let src = "int fact(int n){if(n<=1)return 1;return n*fact(n-1);} \
               int main(){PRINT(fact(5));}";
    assert_eq!(run(src, ""), "120");
}

#[test]
fn missing_main_reports_no_entry() {
    let program = parse("int helper(){return 1;}").unwrap();
    let result = eval::run(&program, &b""[..], Vec::new());
    assert!(matches!(result, Err(Error::NoEntry)));
}
